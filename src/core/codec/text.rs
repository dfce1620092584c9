use log::warn;

use crate::core::geom::Vec2;
use crate::core::model::{Comp, CompArgs, PortRef, Schematic, WireGraph, WireNode};

/// One diagnostic from the text importer. Parsing never throws; problems are
/// accumulated and returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct LineIssue {
    pub issue: String,
    pub line_no: usize,
    pub line_content: String,
    pub col_no: Option<usize>,
}

#[derive(Debug, Default)]
pub struct ImportResult {
    pub issues: Vec<LineIssue>,
    /// Present only when the issue list is empty.
    pub schematic: Option<Schematic>,
}

/// Serialize a schematic to the line-oriented `#wire-schema 1` text form.
///
/// Deterministic: comps then wires in declaration order, canonical
/// separators, rotation written only when non-zero, and wire edges written in
/// back-reference-only form. Re-importing the output reproduces it exactly.
pub fn export_schematic(schematic: &Schematic) -> String {
    let mut out = String::from("#wire-schema 1\n");

    for comp in &schematic.comps {
        let config = comp
            .args
            .as_ref()
            .map(|a| format!(" c:{}", serde_json::to_string(a).unwrap_or_default()))
            .unwrap_or_default();
        if comp.rotation != 0 {
            out += &format!(
                "C {} {} p:{},{},{}{}\n",
                comp.id, comp.def_id, comp.pos.x, comp.pos.y, comp.rotation, config
            );
        } else {
            out += &format!(
                "C {} {} p:{},{}{}\n",
                comp.id, comp.def_id, comp.pos.x, comp.pos.y, config
            );
        }
    }

    for wire in &schematic.wires {
        out += &format!("W {} ns:[", wire.id);
        for (j, node) in wire.nodes.iter().enumerate() {
            if j > 0 {
                out.push('|');
            }
            out += &format!("{},{}", node.pos.x, node.pos.y);
            for &edge in node.edges.iter().filter(|&&e| e < j) {
                out += &format!(",{}", edge);
            }
            if let Some(port_ref) = &node.port_ref {
                out += &format!(" p:{}/{}", port_ref.comp_id, port_ref.port_id);
            }
        }
        out += "]\n";
    }

    out
}

/// Parse the text form back into a schematic.
///
/// Malformed lines become `LineIssue` records rather than errors; the parsed
/// schematic is returned only when the issue list is empty. The importer
/// self-checks `export(import(text)) == text` and records a diagnostic on
/// mismatch without withholding the result.
pub fn import_schematic(text: &str) -> ImportResult {
    let mut res = ImportResult::default();
    let lines: Vec<&str> = text.split('\n').collect();

    let mut issue = |issues: &mut Vec<LineIssue>, msg: String, line_idx: usize| {
        issues.push(LineIssue {
            issue: msg,
            line_no: line_idx + 1,
            line_content: lines.get(line_idx).unwrap_or(&"").to_string(),
            col_no: None,
        });
    };

    if lines.is_empty() || !lines[0].starts_with("#wire-schema") {
        issue(
            &mut res.issues,
            "Invalid file format: first line must be #wire-schema <version>".to_string(),
            0,
        );
        return res;
    }
    let version = lines[0].split(' ').nth(1).and_then(|v| v.parse::<u32>().ok());
    if version != Some(1) {
        issue(
            &mut res.issues,
            "Invalid file format: only version 1 is supported".to_string(),
            0,
        );
        return res;
    }

    let mut comps: Vec<Comp> = Vec::new();
    let mut wires: Vec<WireGraph> = Vec::new();

    for (line_idx, line_raw) in lines.iter().enumerate() {
        let line = line_raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts = parse_parts(line);

        if parts.first().map(|p| p.text.as_str()) == Some("C") {
            if parts.len() < 3 {
                issue(
                    &mut res.issues,
                    "Invalid component line: must have at least 3 parts".to_string(),
                    line_idx,
                );
                continue;
            }
            let mut comp = Comp::placeholder(&parts[1].text, &parts[2].text);

            for part in &parts[3..] {
                match part.label.as_deref() {
                    Some("p") => {
                        let nums: Vec<&str> = part.value.split(',').collect();
                        if nums.len() != 2 && nums.len() != 3 {
                            issue(
                                &mut res.issues,
                                "Invalid component line: p: must have 2 or 3 parts".to_string(),
                                line_idx,
                            );
                            continue;
                        }
                        let x = nums[0].parse::<f64>();
                        let y = nums[1].parse::<f64>();
                        let (Ok(x), Ok(y)) = (x, y) else {
                            issue(
                                &mut res.issues,
                                "Invalid component line: p: must have 2 or 3 numbers".to_string(),
                                line_idx,
                            );
                            continue;
                        };
                        let r = nums
                            .get(2)
                            .and_then(|s| s.parse::<f64>().ok())
                            .unwrap_or(0.0);
                        comp.pos = Vec2::new(x, y);
                        comp.rotation = (r as u8) % 4;
                    }
                    Some("c") => match serde_json::from_str::<CompArgs>(&part.value) {
                        Ok(args) => comp.args = Some(args),
                        Err(e) => issue(
                            &mut res.issues,
                            format!("Invalid component line: bad config json: {}", e),
                            line_idx,
                        ),
                    },
                    _ => issue(
                        &mut res.issues,
                        format!(
                            "Invalid component line: unknown part [{}] [{}]",
                            part.label.as_deref().unwrap_or(""),
                            part.value
                        ),
                        line_idx,
                    ),
                }
            }

            comps.push(comp);
        } else if parts.first().map(|p| p.text.as_str()) == Some("W") {
            if parts.len() < 3 {
                issue(
                    &mut res.issues,
                    "Invalid wire line: must have at least 3 space-separated parts".to_string(),
                    line_idx,
                );
                continue;
            }
            let mut wire = WireGraph::new(&parts[1].text);

            for part in &parts {
                if part.label.as_deref() != Some("ns") {
                    continue;
                }
                for node_str in part.value.split('|') {
                    let node_parts = parse_parts(node_str);
                    let Some(first) = node_parts.first() else { continue };
                    let nums: Vec<&str> = first.text.split(',').collect();
                    if nums.len() < 2 {
                        issue(
                            &mut res.issues,
                            "Invalid wire node: must have at least 2 parts".to_string(),
                            line_idx,
                        );
                        continue;
                    }
                    let (Ok(x), Ok(y)) = (nums[0].parse::<f64>(), nums[1].parse::<f64>()) else {
                        issue(
                            &mut res.issues,
                            "Invalid wire node: must have 2 numbers".to_string(),
                            line_idx,
                        );
                        continue;
                    };

                    let mut node = WireNode::new(wire.nodes.len(), Vec2::new(x, y));
                    for edge_str in &nums[2..] {
                        match edge_str.parse::<usize>() {
                            Ok(edge) => node.edges.push(edge),
                            Err(_) => issue(
                                &mut res.issues,
                                "Invalid wire node: edge must be a number".to_string(),
                                line_idx,
                            ),
                        }
                    }

                    for node_part in &node_parts {
                        if node_part.label.as_deref() == Some("p") {
                            let ref_parts: Vec<&str> = node_part.value.split('/').collect();
                            if ref_parts.len() != 2 {
                                issue(
                                    &mut res.issues,
                                    "Invalid wire node: p: must have 2 parts".to_string(),
                                    line_idx,
                                );
                                continue;
                            }
                            node.port_ref = Some(PortRef::new(ref_parts[0], ref_parts[1]));
                        }
                    }

                    wire.nodes.push(node);
                }
            }

            // edges are serialized as back-references only; mirror them
            for i in 0..wire.nodes.len() {
                let back_edges: Vec<usize> = wire.nodes[i]
                    .edges
                    .iter()
                    .copied()
                    .filter(|&e| e < i)
                    .collect();
                for e in back_edges {
                    wire.nodes[e].edges.push(i);
                }
            }

            wires.push(wire);
        } else {
            issue(
                &mut res.issues,
                format!(
                    "Unexpected line start letter: '{}'",
                    line.chars().next().unwrap_or(' ')
                ),
                line_idx,
            );
        }
    }

    let mut schematic = Schematic::new("", "");
    schematic.comps = comps;
    schematic.wires = wires;
    schematic.recompute_next_ids();

    let out = export_schematic(&schematic);
    if out.replace('\r', "") != text.replace('\r', "") {
        issue(
            &mut res.issues,
            "Exported data does not match imported data".to_string(),
            0,
        );
        warn!("import self-check mismatch\n--- input:\n{}\n--- re-export:\n{}", text, out);
    }

    if res.issues.is_empty() {
        res.schematic = Some(schematic);
    }

    res
}

#[derive(Debug, Clone, PartialEq)]
struct LinePart {
    /// The whole matched token, label and brackets included.
    text: String,
    label: Option<String>,
    /// The token's payload, with `[...]` brackets stripped.
    value: String,
}

/// Split one line into labeled parts: `label:value` where value is a bare
/// token, a `[...]` group or a `{...}` JSON object (taken greedily so nested
/// braces survive).
fn parse_parts(line: &str) -> Vec<LinePart> {
    let chars: Vec<char> = line.chars().collect();
    let mut parts = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        let start = i;
        let mut label = None;
        let mut j = i;
        while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
            j += 1;
        }
        if j > i && j < chars.len() && chars[j] == ':' {
            label = Some(chars[i..j].iter().collect::<String>());
            i = j + 1;
        }

        let value: String;
        if i < chars.len() && chars[i] == '[' {
            let close = (i + 1..chars.len()).find(|&k| chars[k] == ']');
            match close {
                Some(k) => {
                    value = chars[i + 1..k].iter().collect();
                    i = k + 1;
                }
                None => {
                    value = chars[i..].iter().collect();
                    i = chars.len();
                }
            }
        } else if i < chars.len() && chars[i] == '{' {
            let close = (i..chars.len()).rev().find(|&k| chars[k] == '}');
            match close {
                Some(k) => {
                    value = chars[i..=k].iter().collect();
                    i = k + 1;
                }
                None => {
                    value = chars[i..].iter().collect();
                    i = chars.len();
                }
            }
        } else {
            let mut k = i;
            while k < chars.len()
                && !chars[k].is_whitespace()
                && !matches!(chars[k], '[' | ']' | ':')
            {
                k += 1;
            }
            if k == i {
                // stray bracket/colon; skip it
                i += 1;
                continue;
            }
            value = chars[i..k].iter().collect();
            i = k;
        }

        let text = chars[start..i].iter().collect::<String>().trim().to_string();
        parts.push(LinePart { text, label, value });
    }

    parts
}
