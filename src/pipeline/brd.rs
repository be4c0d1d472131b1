//! BRD text serialisation.
//!
//! ```text
//! Version 1.0
//! Component<i> <kind> <x> <y>
//! Connection<j> <x1> <y1> <x2> <y2>
//! ```
//!
//! Indices are 0-based positions in the schematic's sequences. Component size
//! is not part of the format. Every field is an integer or the fixed kind tag,
//! so nothing needs escaping.

use crate::model::{ComponentRecord, ConnectionRecord, SchematicResult};
use std::fmt::Write;

/// Literal first line of every BRD document.
pub const HEADER: &str = "Version 1.0";

/// Render a schematic as BRD text. Every line, including the last, ends in
/// `\n`.
pub fn to_brd(schematic: &SchematicResult) -> String {
    let mut out = String::with_capacity(
        16 + schematic.components.len() * 40 + schematic.connections.len() * 32,
    );
    out.push_str(HEADER);
    out.push('\n');

    for (i, c) in schematic.components.iter().enumerate() {
        write_component(&mut out, i, c);
    }
    for (j, c) in schematic.connections.iter().enumerate() {
        write_connection(&mut out, j, c);
    }
    out
}

fn write_component(out: &mut String, i: usize, c: &ComponentRecord) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Component{i} {} {} {}", c.kind, c.position.x, c.position.y);
}

fn write_connection(out: &mut String, j: usize, c: &ConnectionRecord) {
    let _ = writeln!(
        out,
        "Connection{j} {} {} {} {}",
        c.start.x, c.start.y, c.end.x, c.end.y
    );
}
