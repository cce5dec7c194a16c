use super::*;
use crate::error::SchemaError;

fn number() -> Node {
    Node::new("NumberExpr", "Number")
        .field("token", FieldType::Token)
        .field("number", FieldType::Primitive(Primitive::F64))
        .template("{}", ["token"])
}

fn group() -> Node {
    Node::new("GroupExpr", "Group")
        .field("paren_open", FieldType::Token)
        .field("inner", FieldType::node("Expr"))
        .field("paren_close", FieldType::Token)
        .template("({})", ["inner"])
}

fn expr() -> Category {
    Category::new("Expr").node(number()).node(group())
}

fn with_node(node: Node) -> Schema {
    Schema::new().category(expr().node(node))
}

fn validate(schema: &Schema) -> SchemaError {
    schema.validate().unwrap_err()
}

#[test]
fn from_json() {
    let schema = Schema::from_json(
        r#"{
            "categories": [
                {
                    "name": "Expr",
                    "nodes": [
                        {
                            "name": "VarExpr",
                            "tag": "Var",
                            "fields": [
                                { "name": "identifier", "type": "token" },
                                { "name": "depth", "type": { "primitive": "i64" } }
                            ],
                            "render": { "template": { "format": "{}", "args": ["identifier"] } }
                        },
                        {
                            "name": "ListExpr",
                            "tag": "List",
                            "fields": [
                                { "name": "items", "type": { "sequence": "Expr" } },
                                { "name": "tail", "type": { "optional_node": "Expr" } }
                            ],
                            "render": {
                                "custom": [
                                    { "literal": "(list " },
                                    { "for_each": { "field": "items", "body": ["item"], "separator": " " } },
                                    { "if_present": { "field": "tail", "then": [{ "literal": ". " }, "item"] } },
                                    { "literal": ")" }
                                ]
                            }
                        }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(schema.collaborators, Collaborators::default());
    let category = &schema.categories[0];
    assert_eq!(category.module_name(), "expr");

    let var = &category.nodes[0];
    let names = var.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["identifier", "depth"]);
    assert_eq!(var.fields[1].ty, FieldType::Primitive(Primitive::I64));

    let list = &category.nodes[1];
    assert_eq!(
        list.render,
        Render::Custom(vec![
            RenderOp::literal("(list "),
            RenderOp::for_each("items", [RenderOp::Item], " "),
            RenderOp::if_present("tail", [RenderOp::literal(". "), RenderOp::Item]),
            RenderOp::literal(")"),
        ])
    );

    assert!(schema.validate().is_ok());
}

#[test]
fn partial_collaborators() {
    let schema = Schema::from_json(
        r#"{
            "collaborators": { "token": "cahn::token::Token", "lexeme": "text" },
            "categories": []
        }"#,
    )
    .unwrap();

    assert_eq!(schema.collaborators.token, "cahn::token::Token");
    assert_eq!(schema.collaborators.lexeme, "text");
    assert_eq!(schema.collaborators.arena, "bumpalo::Bump");
}

#[test]
fn explicit_module() {
    let category = Category::new("StmtList").with_module("statements");
    assert_eq!(category.module_name(), "statements");
    assert_eq!(Category::new("StmtList").module_name(), "stmt_list");
}

#[test]
fn malformed_json() {
    let err = Schema::from_json(r#"{ "categories": [{ "name": "Expr" }] }"#).unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "{err:?}");
}

#[test]
fn malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodes.json");
    std::fs::write(&path, r#"{ "categories": [{ "name": "Expr" }] }"#).unwrap();

    let err = Schema::load(&path).unwrap_err();

    let Error::ParseFile { path: reported, .. } = &err else {
        panic!("expected a parse error, got {err:?}");
    };
    assert_eq!(*reported, path);
    assert_eq!(err.to_string(), format!("failed to parse schema {}", path.display()));
}

#[test]
fn missing_file() {
    let err = Schema::load("does/not/exist.json").unwrap_err();
    assert!(matches!(err, Error::Load { .. }), "{err:?}");
}

#[test]
fn resolves_names() {
    let schema = Schema::new().category(expr());
    let index = schema.validate().unwrap();

    assert_eq!(index.resolve("Expr"), Some(Target::Union { category: 0 }));
    assert_eq!(
        index.resolve("GroupExpr"),
        Some(Target::Record {
            category: 0,
            node: 1
        })
    );
    assert_eq!(index.resolve("Stmt"), None);
}

#[test]
fn empty_category() {
    let schema = Schema::new().category(Category::new("Expr"));
    insta::assert_snapshot!(validate(&schema), @"category `Expr` has no nodes");
}

#[test]
fn duplicate_tag() {
    let schema = with_node(
        Node::new("OtherNumberExpr", "Number")
            .field("token", FieldType::Token)
            .template("{}", ["token"]),
    );
    insta::assert_snapshot!(validate(&schema), @"duplicate tag `Number` in category `Expr`");
}

#[test]
fn tags_are_per_category() {
    let schema = Schema::new().category(expr()).category(
        Category::new("Stmt").node(
            Node::new("NumberStmt", "Number")
                .field("token", FieldType::Token)
                .template("{}", ["token"]),
        ),
    );
    assert!(schema.validate().is_ok());
}

#[test]
fn duplicate_name() {
    let schema = with_node(Node::new("Expr", "Nested").template("x", Vec::<String>::new()));
    insta::assert_snapshot!(validate(&schema), @"duplicate type name `Expr`");

    let schema = Schema::new().category(expr()).category(
        Category::new("Stmt").node(number().template("{}", ["token"])),
    );
    insta::assert_snapshot!(validate(&schema), @"duplicate type name `NumberExpr`");
}

#[test]
fn duplicate_module() {
    let schema = Schema::new()
        .category(expr())
        .category(Category::new("Stmt").with_module("expr").node(
            Node::new("EmptyStmt", "Empty").template(";", Vec::<String>::new()),
        ));
    insta::assert_snapshot!(validate(&schema), @"duplicate module `expr`");
}

#[test]
fn duplicate_field() {
    let schema = with_node(
        Node::new("PairExpr", "Pair")
            .field("left", FieldType::node("Expr"))
            .field("left", FieldType::node("Expr"))
            .template("({})", ["left"]),
    );
    insta::assert_snapshot!(validate(&schema), @"duplicate field `left` in `PairExpr`");
}

#[test]
fn invalid_names() {
    let schema = with_node(Node::new("callExpr", "Call"));
    insta::assert_snapshot!(validate(&schema), @"`callExpr` is not a valid PascalCase identifier");

    let schema = with_node(Node::new("CallExpr", "call_expr"));
    insta::assert_snapshot!(validate(&schema), @"`call_expr` is not a valid PascalCase identifier");

    let schema = with_node(Node::new("CallExpr", "Call").field("Callee", FieldType::Token));
    insta::assert_snapshot!(validate(&schema), @"`Callee` is not a valid snake_case identifier");

    let schema = with_node(Node::new("CallExpr", "Call").field("2nd", FieldType::Token));
    insta::assert_snapshot!(validate(&schema), @"`2nd` is not a valid snake_case identifier");
}

#[test]
fn reserved_names() {
    let schema = with_node(Node::new("CastExpr", "Cast").field("type", FieldType::Token));
    insta::assert_snapshot!(validate(&schema), @"`type` is reserved");

    let schema = with_node(Node::new("NewExpr", "New").field("arena", FieldType::Token));
    insta::assert_snapshot!(validate(&schema), @"`arena` is reserved");

    let schema = with_node(Node::new("Token", "Token"));
    insta::assert_snapshot!(validate(&schema), @"`Token` is reserved");

    let schema = with_node(Node::new("SelfExpr", "Self"));
    insta::assert_snapshot!(validate(&schema), @"`Self` is reserved");
}

#[test]
fn option_is_reserved() {
    let schema = with_node(
        Node::new("Option", "Labelled")
            .field("label", FieldType::OptionalToken)
            .template("label", Vec::<String>::new()),
    );
    insta::assert_snapshot!(validate(&schema), @"`Option` is reserved");

    let schema = Schema::new().category(expr()).category(
        Category::new("Option").node(
            Node::new("SomeOption", "Some")
                .field("value", FieldType::node("Expr"))
                .template("{}", ["value"]),
        ),
    );
    insta::assert_snapshot!(validate(&schema), @"`Option` is reserved");
}

#[test]
fn unknown_target() {
    let schema = with_node(
        Node::new("CallExpr", "Call")
            .field("args", FieldType::sequence("Argument"))
            .template("(call)", Vec::<String>::new()),
    );
    insta::assert_snapshot!(validate(&schema), @"field `CallExpr.args` refers to unknown type `Argument`");
}

#[test]
fn forward_reference() {
    let stmt = Category::new("Stmt").node(
        Node::new("ExprStmt", "ExprStmt")
            .field("expr", FieldType::node("Expr"))
            .template("{}", ["expr"]),
    );
    let expr = expr().node(
        Node::new("BlockExpr", "Block")
            .field("body", FieldType::sequence("Stmt"))
            .template("(block)", Vec::<String>::new()),
    );

    // statements may refer to expressions, not the other way around
    let schema = Schema::new().category(expr.clone()).category(stmt.clone());
    insta::assert_snapshot!(
        validate(&schema),
        @"field `BlockExpr.body` refers to `Stmt` from category `Stmt`, which is declared later"
    );

    let schema = Schema::new().category(stmt).category(expr);
    insta::assert_snapshot!(
        validate(&schema),
        @"field `ExprStmt.expr` refers to `Expr` from category `Expr`, which is declared later"
    );
}

#[test]
fn plain_record_target() {
    let schema = with_node(
        Node::new("WrapExpr", "Wrap")
            .field("number", FieldType::node("NumberExpr"))
            .template("{}", ["number"]),
    );
    insta::assert_snapshot!(
        validate(&schema),
        @"field `WrapExpr.number` embeds `NumberExpr`, which has no node fields and cannot be embedded"
    );
}

#[test]
fn record_targets() {
    let schema = with_node(
        Node::new("ParenExpr", "Paren")
            .field("group", FieldType::node("GroupExpr"))
            .field("groups", FieldType::sequence("GroupExpr"))
            .field("extra", FieldType::optional_node("GroupExpr"))
            .template("{}", ["group"]),
    );
    assert!(schema.validate().is_ok());
}

#[test]
fn record_cycle() {
    let schema = with_node(
        Node::new("NestedExpr", "Nested")
            .field("inner", FieldType::optional_node("NestedExpr"))
            .template("(nested)", Vec::<String>::new()),
    );
    insta::assert_snapshot!(validate(&schema), @"`NestedExpr` contains itself by value through `NestedExpr -> NestedExpr`");

    let schema = Schema::new().category(
        expr()
            .node(
                Node::new("LeftExpr", "Left")
                    .field("right", FieldType::node("RightExpr"))
                    .template("{}", ["right"]),
            )
            .node(
                Node::new("RightExpr", "Right")
                    .field("left", FieldType::optional_node("LeftExpr"))
                    .template("right", Vec::<String>::new()),
            ),
    );
    insta::assert_snapshot!(validate(&schema), @"`LeftExpr` contains itself by value through `LeftExpr -> RightExpr -> LeftExpr`");
}

#[test]
fn sequences_break_cycles() {
    let schema = with_node(
        Node::new("TreeExpr", "Tree")
            .field("children", FieldType::sequence("TreeExpr"))
            .template("(tree)", Vec::<String>::new()),
    );
    assert!(schema.validate().is_ok());
}

#[test]
fn template_errors() {
    let schema = with_node(
        Node::new("NegExpr", "Neg")
            .field("operator", FieldType::Token)
            .field("inner", FieldType::node("Expr"))
            .template("({} {})", ["operator"]),
    );
    insta::assert_snapshot!(validate(&schema), @"template for `NegExpr` has 2 placeholders but 1 arguments");

    let schema = with_node(
        Node::new("NegExpr", "Neg")
            .field("inner", FieldType::node("Expr"))
            .template("(- {0})", ["inner"]),
    );
    insta::assert_snapshot!(validate(&schema), @"invalid template for `NegExpr`: unmatched `{` at byte 3");

    let schema = with_node(
        Node::new("NegExpr", "Neg")
            .field("inner", FieldType::node("Expr"))
            .template("(- {})", ["outer"]),
    );
    insta::assert_snapshot!(validate(&schema), @"`NegExpr` renders unknown field `outer`");

    let schema = with_node(
        Node::new("ListExpr", "List")
            .field("items", FieldType::sequence("Expr"))
            .template("(list {})", ["items"]),
    );
    insta::assert_snapshot!(validate(&schema), @"field `ListExpr.items` cannot be rendered directly, use a custom renderer");
}

#[test]
fn custom_errors() {
    let list = || {
        Node::new("ListExpr", "List")
            .field("open", FieldType::Token)
            .field("items", FieldType::sequence("Expr"))
            .field("tail", FieldType::optional_node("Expr"))
    };

    let schema = with_node(list().custom([RenderOp::for_each("open", [], "")]));
    insta::assert_snapshot!(validate(&schema), @"`for_each` over `ListExpr.open`, which is not a sequence");

    let schema = with_node(list().custom([RenderOp::if_present("items", [])]));
    insta::assert_snapshot!(validate(&schema), @"`if_present` over `ListExpr.items`, which is not optional");

    let schema = with_node(list().custom([RenderOp::literal("("), RenderOp::Item]));
    insta::assert_snapshot!(validate(&schema), @"`item` used outside of `for_each` or `if_present` in `ListExpr`");

    let schema = with_node(list().custom([RenderOp::field("tail")]));
    insta::assert_snapshot!(validate(&schema), @"field `ListExpr.tail` cannot be rendered directly, use a custom renderer");

    let schema = with_node(list().custom([RenderOp::for_each("elements", [], "")]));
    insta::assert_snapshot!(validate(&schema), @"`ListExpr` renders unknown field `elements`");

    let schema = with_node(list().custom([
        RenderOp::field("open"),
        RenderOp::for_each("items", [RenderOp::Item], " "),
        RenderOp::if_present("tail", [RenderOp::Item]),
    ]));
    assert!(schema.validate().is_ok());
}
