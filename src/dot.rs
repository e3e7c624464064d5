//! Render the tree shape of an [`AvlDict`] in Graphviz DOT format.
//!
//! Only canonical nodes are drawn, duplicate chains do not take part in
//! the tree.

use std::{fmt::Display, io};

use crate::dict::AvlDict;
use crate::node::NodeId;

/// Fill colour used by [`write_dot`].
pub const DEFAULT_FILL: &str = "yellow";

/// Write `dict` as a `digraph`, one `parent -> child` edge per line in
/// pre-order. A dictionary with a lone root writes that root as a bare
/// node, an empty one writes no nodes at all.
pub fn write_dot<K, V, C, W>(dict: &AvlDict<K, V, C>, out: &mut W) -> io::Result<()>
where
    K: Display,
    W: io::Write,
{
    write_dot_filled(dict, DEFAULT_FILL, out)
}

/// Same as [`write_dot`], with nodes filled in `fill`, any Graphviz
/// colour name.
pub fn write_dot_filled<K, V, C, W>(
    dict: &AvlDict<K, V, C>,
    fill: &str,
    out: &mut W,
) -> io::Result<()>
where
    K: Display,
    W: io::Write,
{
    writeln!(out, "digraph BST {{")?;
    writeln!(
        out,
        "    node [fontname=\"Arial\", shape=circle, style=filled, fillcolor={}];",
        fill
    )?;
    if let Some(root) = dict.root() {
        match dict.node(root) {
            Some(node) if node.is_leaf() => writeln!(out, "    \"{}\";", node.key())?,
            Some(_) => write_edges(dict, root, out)?,
            None => (),
        }
    }
    writeln!(out, "}}")
}

fn write_edges<K, V, C, W>(dict: &AvlDict<K, V, C>, id: NodeId, out: &mut W) -> io::Result<()>
where
    K: Display,
    W: io::Write,
{
    let node = match dict.node(id) {
        Some(node) => node,
        None => return Ok(()),
    };
    for child in [node.left(), node.right()].into_iter().flatten() {
        if let Some(cref) = dict.node(child) {
            writeln!(out, "    \"{}\" -> \"{}\";", node.key(), cref.key())?;
            write_edges(dict, child, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(dict: &AvlDict<i64, i64>) -> String {
        let mut out: Vec<u8> = vec![];
        write_dot(dict, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    const HEADER: &str = "digraph BST {\n    \
        node [fontname=\"Arial\", shape=circle, style=filled, fillcolor=yellow];\n";

    #[test]
    fn test_dot_empty() {
        let dict: AvlDict<i64, i64> = AvlDict::new("dot");
        assert_eq!(render(&dict), format!("{}}}\n", HEADER));
    }

    #[test]
    fn test_dot_single() {
        let mut dict: AvlDict<i64, i64> = AvlDict::new("dot");
        dict.insert(7, 0);
        dict.insert(7, 1);
        assert_eq!(render(&dict), format!("{}    \"7\";\n}}\n", HEADER));
    }

    #[test]
    fn test_dot_edges() {
        let mut dict: AvlDict<i64, i64> = AvlDict::new("dot");
        for key in [5, 3, 2, 4, 7, 6, 8] {
            dict.insert(key, key);
        }
        let edges = [
            "    \"5\" -> \"3\";\n",
            "    \"3\" -> \"2\";\n",
            "    \"3\" -> \"4\";\n",
            "    \"5\" -> \"7\";\n",
            "    \"7\" -> \"6\";\n",
            "    \"7\" -> \"8\";\n",
        ];
        let refs = format!("{}{}}}\n", HEADER, edges.concat());
        assert_eq!(render(&dict), refs);
    }

    #[test]
    fn test_dot_filled() {
        let mut dict: AvlDict<i64, i64> = AvlDict::new("dot");
        dict.insert(2, 0);
        dict.insert(1, 0);

        let mut out: Vec<u8> = vec![];
        write_dot_filled(&dict, "green", &mut out).unwrap();
        let refs = "digraph BST {\n    \
            node [fontname=\"Arial\", shape=circle, style=filled, fillcolor=green];\n    \
            \"2\" -> \"1\";\n}\n";
        assert_eq!(String::from_utf8(out).unwrap(), refs);
    }
}
