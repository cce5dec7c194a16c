//! `Display` impls for records.
//!
//! Every write is followed by `?`, so the first sink error stops the
//! renderer and is returned as-is.

use std::fmt::{self, Write as _};

use super::Context;
use crate::join::{Indent, JoinIter as _};
use crate::schema::{FieldType, Node, Render, RenderOp};
use crate::template;

pub(super) fn emit_renderer(cx: &Context<'_, '_>, node: &Node, out: &mut String) -> fmt::Result {
    let name = &node.name;
    let lifetime = if node.needs_lifetime() { "<'_>" } else { "" };

    ln!(out, "impl fmt::Display for {name}{lifetime} {{");
    ln!(
        out,
        "    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{"
    );
    match &node.render {
        Render::Template { format, args } => emit_template(cx, node, format, args, out)?,
        Render::Custom(ops) => {
            if ops.is_empty() {
                ln!(out, "        let _ = f;");
            }
            emit_ops(cx, node, ops, None, 2, out)?;
            ln!(out, "        Ok(())");
        }
    }
    ln!(out, "    }}");
    ln!(out, "}}\n");

    Ok(())
}

fn emit_template(
    cx: &Context<'_, '_>,
    node: &Node,
    format: &str,
    args: &[String],
    out: &mut String,
) -> fmt::Result {
    // the schema was validated, a bad template cannot reach this point
    let segments = template::parse(format).map_err(|_| fmt::Error)?;

    if args.is_empty() {
        ln!(out, "        f.write_str({:?})", template::text(&segments));
        return Ok(());
    }

    let args = args
        .iter()
        .map(|arg| field_expr(cx, node, arg))
        .collect::<Result<Vec<_>, _>>()?;
    // the template syntax is a subset of `format_args!`
    ln!(out, "        write!(f, {format:?}, {})", args.iter().join(", "));

    Ok(())
}

/// Expression displaying a field: a token's lexeme, or the field itself.
fn field_expr(cx: &Context<'_, '_>, node: &Node, name: &str) -> Result<String, fmt::Error> {
    let field = node.get_field(name).ok_or(fmt::Error)?;
    let lexeme = &cx.collaborators().lexeme;
    match field.ty {
        FieldType::Token => Ok(format!("self.{name}.{lexeme}()")),
        _ => Ok(format!("self.{name}")),
    }
}

/// What `RenderOp::Item` is bound to.
#[derive(Clone, Copy)]
enum Item {
    Token,
    Node,
}

fn emit_ops(
    cx: &Context<'_, '_>,
    node: &Node,
    ops: &[RenderOp],
    item: Option<Item>,
    depth: usize,
    out: &mut String,
) -> fmt::Result {
    let indent = Indent(depth);
    let lexeme = &cx.collaborators().lexeme;

    for op in ops {
        match op {
            RenderOp::Literal(text) => {
                if !text.is_empty() {
                    ln!(out, "{indent}f.write_str({text:?})?;");
                }
            }
            RenderOp::Field(name) => {
                let field = node.get_field(name).ok_or(fmt::Error)?;
                match field.ty {
                    FieldType::Token => ln!(out, "{indent}f.write_str(self.{name}.{lexeme}())?;"),
                    _ => ln!(out, "{indent}fmt::Display::fmt(&self.{name}, f)?;"),
                }
            }
            RenderOp::Item => match item.ok_or(fmt::Error)? {
                Item::Token => ln!(out, "{indent}f.write_str(item.{lexeme}())?;"),
                Item::Node => ln!(out, "{indent}fmt::Display::fmt(item, f)?;"),
            },
            RenderOp::ForEach {
                field,
                body,
                separator,
            } => {
                let binding = if binds_item(body) { "item" } else { "_" };
                ln!(out, "{indent}for {binding} in self.{field}.iter() {{");
                emit_ops(cx, node, body, Some(Item::Node), depth + 1, out)?;
                if !separator.is_empty() {
                    ln!(out, "{}f.write_str({separator:?})?;", Indent(depth + 1));
                }
                ln!(out, "{indent}}}");
            }
            RenderOp::IfPresent { field, then } => {
                let bound = match node.get_field(field).map(|field| &field.ty) {
                    Some(FieldType::OptionalToken) => Item::Token,
                    Some(FieldType::OptionalNode(_)) => Item::Node,
                    _ => return Err(fmt::Error),
                };
                if binds_item(then) {
                    ln!(out, "{indent}if let Some(item) = &self.{field} {{");
                } else {
                    ln!(out, "{indent}if self.{field}.is_some() {{");
                }
                emit_ops(cx, node, then, Some(bound), depth + 1, out)?;
                ln!(out, "{indent}}}");
            }
        }
    }

    Ok(())
}

/// Whether `ops` refer to the item bound around them. Nested `ForEach` and
/// `IfPresent` bind their own.
fn binds_item(ops: &[RenderOp]) -> bool {
    ops.iter().any(|op| matches!(op, RenderOp::Item))
}
