use std::collections::{BTreeMap, BTreeSet};

use heck::{ToSnakeCase as _, ToUpperCamelCase as _};

use super::{FieldType, Node, Render, RenderOp, Schema};
use crate::error::SchemaError;
use crate::template;

// `gen` is reserved since edition 2024.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Prelude types named unqualified in generated units.
const PRELUDE_TYPES: &[&str] = &["Option"];

/// Name of the arena parameter of generated constructors.
pub(crate) const ARENA_PARAM: &str = "arena";

/// What a type name in the schema refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Union { category: usize },
    Record { category: usize, node: usize },
}

impl Target {
    pub fn category(&self) -> usize {
        match *self {
            Target::Union { category } => category,
            Target::Record { category, .. } => category,
        }
    }
}

/// Name lookup over a validated schema.
#[derive(Debug)]
pub struct Index<'s> {
    schema: &'s Schema,
    types: BTreeMap<&'s str, Target>,
}

impl<'s> Index<'s> {
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn resolve(&self, name: &str) -> Option<Target> {
        self.types.get(name).copied()
    }

    pub fn node(&self, category: usize, node: usize) -> &'s Node {
        &self.schema.categories[category].nodes[node]
    }

    fn insert(&mut self, name: &'s str, target: Target) -> Result<(), SchemaError> {
        if self.types.insert(name, target).is_some() {
            return Err(SchemaError::DuplicateName { name: name.into() });
        }
        Ok(())
    }
}

impl Schema {
    /// Checks the schema and builds its name index.
    ///
    /// Emission assumes a schema which passed this check.
    pub fn validate(&self) -> Result<Index<'_>, SchemaError> {
        let mut index = Index {
            schema: self,
            types: BTreeMap::new(),
        };
        let reserved = self.reserved_type_names();

        let mut modules = BTreeSet::new();
        for (c, category) in self.categories.iter().enumerate() {
            check_pascal_case(&category.name)?;
            check_unreserved(&category.name, &reserved)?;
            let module = category.module_name();
            check_snake_case(&module)?;
            check_unreserved(&module, &[])?;
            if !modules.insert(module.clone()) {
                return Err(SchemaError::DuplicateModule { module });
            }
            if category.nodes.is_empty() {
                return Err(SchemaError::EmptyCategory {
                    category: category.name.clone(),
                });
            }
            index.insert(&category.name, Target::Union { category: c })?;

            let mut tags = BTreeSet::new();
            for (n, node) in category.nodes.iter().enumerate() {
                check_pascal_case(&node.name)?;
                check_unreserved(&node.name, &reserved)?;
                check_pascal_case(&node.tag)?;
                check_unreserved(&node.tag, &[])?;
                if !tags.insert(node.tag.as_str()) {
                    return Err(SchemaError::DuplicateTag {
                        category: category.name.clone(),
                        tag: node.tag.clone(),
                    });
                }
                index.insert(&node.name, Target::Record { category: c, node: n })?;

                let mut fields = BTreeSet::new();
                for field in &node.fields {
                    check_snake_case(&field.name)?;
                    check_unreserved(&field.name, &[ARENA_PARAM])?;
                    if !fields.insert(field.name.as_str()) {
                        return Err(SchemaError::DuplicateField {
                            node: node.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                }
            }
        }

        // every name is known from here on
        for (c, category) in self.categories.iter().enumerate() {
            for node in &category.nodes {
                for field in &node.fields {
                    let Some(target_name) = field.ty.target() else {
                        continue;
                    };
                    let Some(target) = index.resolve(target_name) else {
                        return Err(SchemaError::UnknownTarget {
                            node: node.name.clone(),
                            field: field.name.clone(),
                            target: target_name.into(),
                        });
                    };
                    if target.category() > c {
                        return Err(SchemaError::ForwardReference {
                            node: node.name.clone(),
                            field: field.name.clone(),
                            target: target_name.into(),
                            category: self.categories[target.category()].name.clone(),
                        });
                    }
                    let plain = match target {
                        Target::Record { category, node } => {
                            !index.node(category, node).needs_lifetime()
                        }
                        Target::Union { .. } => false,
                    };
                    if plain {
                        return Err(SchemaError::PlainRecordTarget {
                            node: node.name.clone(),
                            field: field.name.clone(),
                            target: target_name.into(),
                        });
                    }
                }

                check_render(node)?;
            }
        }

        CycleCheck::new(&index).run()?;

        Ok(index)
    }

    /// Type names a category or record must not shadow: the collaborators
    /// imported into units, and prelude types the units refer to.
    fn reserved_type_names(&self) -> Vec<&str> {
        let c = &self.collaborators;
        [&c.token, &c.atom, &c.arena, &c.sequence]
            .into_iter()
            .map(|path| simple_name(path))
            .chain(PRELUDE_TYPES.iter().copied())
            .collect()
    }
}

/// Last segment of a path, `bumpalo::Bump` -> `Bump`.
pub(crate) fn simple_name(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

fn check_pascal_case(name: &str) -> Result<(), SchemaError> {
    let valid = name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.to_upper_camel_case() == name;
    if !valid {
        return Err(SchemaError::InvalidName {
            name: name.into(),
            expected: "PascalCase",
        });
    }
    Ok(())
}

fn check_snake_case(name: &str) -> Result<(), SchemaError> {
    let valid =
        name.starts_with(|c: char| c.is_ascii_lowercase()) && name.to_snake_case() == name;
    if !valid {
        return Err(SchemaError::InvalidName {
            name: name.into(),
            expected: "snake_case",
        });
    }
    Ok(())
}

fn check_unreserved(name: &str, extra: &[&str]) -> Result<(), SchemaError> {
    if KEYWORDS.contains(&name) || extra.contains(&name) {
        return Err(SchemaError::ReservedName { name: name.into() });
    }
    Ok(())
}

fn check_render(node: &Node) -> Result<(), SchemaError> {
    match &node.render {
        Render::Template { format, args } => {
            let segments =
                template::parse(format).map_err(|err| SchemaError::InvalidTemplate {
                    node: node.name.clone(),
                    message: err.to_string(),
                })?;
            let placeholders = template::placeholders(&segments);
            if placeholders != args.len() {
                return Err(SchemaError::TemplateArity {
                    node: node.name.clone(),
                    placeholders,
                    args: args.len(),
                });
            }
            for arg in args {
                check_displayable(node, arg)?;
            }
            Ok(())
        }
        Render::Custom(ops) => check_ops(node, ops, false),
    }
}

fn check_ops(node: &Node, ops: &[RenderOp], bound: bool) -> Result<(), SchemaError> {
    for op in ops {
        match op {
            RenderOp::Literal(_) => {}
            RenderOp::Field(name) => check_displayable(node, name)?,
            RenderOp::Item => {
                if !bound {
                    return Err(SchemaError::UnboundItem {
                        node: node.name.clone(),
                    });
                }
            }
            RenderOp::ForEach { field, body, .. } => {
                if !matches!(field_type(node, field)?, FieldType::Sequence(_)) {
                    return Err(SchemaError::NotSequence {
                        node: node.name.clone(),
                        field: field.clone(),
                    });
                }
                check_ops(node, body, true)?;
            }
            RenderOp::IfPresent { field, then } => {
                if !matches!(
                    field_type(node, field)?,
                    FieldType::OptionalNode(_) | FieldType::OptionalToken
                ) {
                    return Err(SchemaError::NotOptional {
                        node: node.name.clone(),
                        field: field.clone(),
                    });
                }
                check_ops(node, then, true)?;
            }
        }
    }
    Ok(())
}

fn field_type<'n>(node: &'n Node, name: &str) -> Result<&'n FieldType, SchemaError> {
    match node.get_field(name) {
        Some(field) => Ok(&field.ty),
        None => Err(SchemaError::UnknownField {
            node: node.name.clone(),
            field: name.into(),
        }),
    }
}

fn check_displayable(node: &Node, name: &str) -> Result<(), SchemaError> {
    match field_type(node, name)? {
        FieldType::Token | FieldType::Primitive(_) | FieldType::Node(_) => Ok(()),
        FieldType::OptionalToken | FieldType::OptionalNode(_) | FieldType::Sequence(_) => {
            Err(SchemaError::NotTemplatable {
                node: node.name.clone(),
                field: name.into(),
            })
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Records embedded by value must not contain themselves.
///
/// Sequences and unions are behind arena references, so only
/// `node` and `optional_node` fields naming a record are edges.
struct CycleCheck<'i, 's> {
    index: &'i Index<'s>,
    marks: Vec<Vec<Mark>>,
    path: Vec<&'s str>,
}

impl<'i, 's> CycleCheck<'i, 's> {
    fn new(index: &'i Index<'s>) -> Self {
        let marks = index
            .schema()
            .categories
            .iter()
            .map(|category| vec![Mark::Unvisited; category.nodes.len()])
            .collect();
        Self {
            index,
            marks,
            path: Vec::new(),
        }
    }

    fn run(mut self) -> Result<(), SchemaError> {
        let schema = self.index.schema();
        for (c, category) in schema.categories.iter().enumerate() {
            for n in 0..category.nodes.len() {
                self.visit(c, n)?;
            }
        }
        Ok(())
    }

    fn visit(&mut self, c: usize, n: usize) -> Result<(), SchemaError> {
        let node = self.index.node(c, n);
        match self.marks[c][n] {
            Mark::Done => return Ok(()),
            Mark::Visiting => {
                let start = self
                    .path
                    .iter()
                    .position(|name| *name == node.name)
                    .unwrap_or(0);
                let mut cycle = self.path[start..].to_vec();
                cycle.push(&node.name);
                return Err(SchemaError::RecordCycle {
                    node: node.name.clone(),
                    path: cycle.join(" -> "),
                });
            }
            Mark::Unvisited => {}
        }

        self.marks[c][n] = Mark::Visiting;
        self.path.push(&node.name);
        for field in &node.fields {
            let (FieldType::Node(target) | FieldType::OptionalNode(target)) = &field.ty else {
                continue;
            };
            if let Some(Target::Record { category, node }) = self.index.resolve(target) {
                self.visit(category, node)?;
            }
        }
        self.path.pop();
        self.marks[c][n] = Mark::Done;

        Ok(())
    }
}
