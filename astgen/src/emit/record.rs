use std::fmt::{self, Write as _};

use super::{Context, lifetime};
use crate::join::JoinIter as _;
use crate::schema::Node;
use crate::schema::validate::{ARENA_PARAM, simple_name};

pub(super) fn emit_record(cx: &Context<'_, '_>, node: &Node, out: &mut String) -> fmt::Result {
    let name = &node.name;
    let lifetime = lifetime(node);

    ln!(out, "#[derive(Debug, Clone)]");
    ln!(out, "pub struct {name}{lifetime} {{");
    for field in &node.fields {
        ln!(out, "    pub {}: {},", field.name, cx.ty(&field.ty));
    }
    ln!(out, "}}\n");

    Ok(())
}

/// `new` takes the arena followed by every field in schema order, and
/// returns the record wrapped in the union.
///
/// The union always carries `'a`, so `new` is generic over it even when
/// the record is not. In that case `'a` goes on the function instead of
/// the `impl`.
///
/// `record` builds the bare record, for embedding it by value in another
/// one, and `into_<module>` wraps an existing record in the union.
pub(super) fn emit_constructor(
    cx: &Context<'_, '_>,
    node: &Node,
    out: &mut String,
) -> fmt::Result {
    let name = &node.name;
    let tag = &node.tag;
    let union = cx.union();
    let module = cx.category().module_name();
    let lifetime = lifetime(node);
    let (impl_generics, fn_generics) = if node.needs_lifetime() {
        ("<'a>", "")
    } else {
        ("", "<'a>")
    };

    let arena = ARENA_PARAM;
    let arena_ty = simple_name(&cx.collaborators().arena);
    let fields = node
        .fields
        .iter()
        .map(|field| format!("{}: {}", field.name, cx.ty(&field.ty)))
        .collect::<Vec<_>>();
    let params = std::iter::once(format!("{arena}: &'a {arena_ty}"))
        .chain(fields.iter().cloned())
        .collect::<Vec<_>>();
    let params = params.iter().join(", ");
    let fields = fields.iter().join(", ");
    let inits = node.fields.iter().map(|field| field.name.as_str()).join(", ");

    ml!(
        out,
        "
        impl{impl_generics} {name}{lifetime} {{
            pub fn new{fn_generics}({params}) -> {union}<'a> {{
                {union}::{tag}({arena}.alloc({name} {{ {inits} }}))
            }}

            pub fn record({fields}) -> Self {{
                Self {{ {inits} }}
            }}

            pub fn into_{module}{fn_generics}(self, {arena}: &'a {arena_ty}) -> {union}<'a> {{
                {union}::{tag}({arena}.alloc(self))
            }}
        }}

        "
    );

    Ok(())
}
