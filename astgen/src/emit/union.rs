use std::fmt::{self, Write as _};

use super::{Context, lifetime};

pub(super) fn emit_union(cx: &Context<'_, '_>, out: &mut String) -> fmt::Result {
    let union = cx.union();

    ln!(out, "#[derive(Debug, Clone)]");
    ln!(out, "pub enum {union}<'a> {{");
    for node in &cx.category().nodes {
        let tag = &node.tag;
        let name = &node.name;
        let lifetime = lifetime(node);
        ln!(out, "    {tag}(&'a {name}{lifetime}),");
    }
    ln!(out, "}}\n");

    Ok(())
}

/// `Display` for the union forwards to the variant's record.
pub(super) fn emit_dispatch(cx: &Context<'_, '_>, out: &mut String) -> fmt::Result {
    let union = cx.union();

    ml!(
        out,
        "
        impl fmt::Display for {union}<'_> {{
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{
                match self {{
        "
    );
    for node in &cx.category().nodes {
        let tag = &node.tag;
        ln!(
            out,
            "            {union}::{tag}(node) => fmt::Display::fmt(node, f),"
        );
    }
    ml!(
        out,
        "
                }}
            }}
        }}

        "
    );

    Ok(())
}
