/*!
 * Rich text cells from OpenDocument spreadsheets.
 *
 * calamine flattens cell formatting away, so italic etymology markup is read
 * straight from the ODS `content.xml`. Spreadsheets in other formats are first
 * converted with the office suite in headless mode.
 */

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use tl::{HTMLTag, Node, NodeHandle, Parser};

use crate::errors::ImportError;
use crate::file_utils::FileManager;

/// Style used for italics when the document declares none
const FALLBACK_ITALIC_STYLE: &str = "T1";

/// Upper bound for expanding `number-*-repeated` on cells with content
const MAX_REPEAT: usize = 1024;

static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|apos|#[0-9]+|#x[0-9a-fA-F]+);").expect("valid entity regex"));

/// Convert a spreadsheet to ODS next to the input file
///
/// Nothing is run when the `.ods` already exists.
pub fn convert_to_ods(office_command: &str, input: &Path) -> Result<PathBuf, ImportError> {
    let ods_path = FileManager::ods_path_for(input);
    if FileManager::file_exists(&ods_path) {
        debug!("Reusing {}", ods_path.display());
        return Ok(ods_path);
    }

    let outdir = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    info!("Converting {} to ODS", input.display());
    let output = Command::new(office_command)
        .args(["--headless", "--convert-to", "ods"])
        .arg(input)
        .arg("--outdir")
        .arg(outdir)
        .output()
        .map_err(|e| ImportError::Conversion(format!("{}: {}", office_command, e)))?;

    if !output.status.success() || !FileManager::file_exists(&ods_path) {
        return Err(ImportError::Conversion(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(ods_path)
}

/// Read `content.xml` out of an ODS archive
pub fn read_content_xml(path: &Path) -> Result<String, ImportError> {
    let ods_error = |e: &dyn std::fmt::Display| ImportError::Ods(format!("{}: {}", path.display(), e));

    let file = File::open(path).map_err(|e| ods_error(&e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ods_error(&e))?;
    let mut entry = archive.by_name("content.xml").map_err(|e| ods_error(&e))?;

    let mut content = String::new();
    entry.read_to_string(&mut content).map_err(|e| ods_error(&e))?;
    Ok(content)
}

/// Cells of the first table rendered as HTML, addressed like [`super::SheetRow`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichTable {
    /// (1-based row, 0-based column) -> html
    cells: HashMap<(usize, usize), String>,
}

impl RichTable {
    /// Convert when needed, then parse the document
    pub fn load(office_command: &str, input: &Path) -> Result<Self, ImportError> {
        let ods_path = convert_to_ods(office_command, input)?;
        Self::parse(&read_content_xml(&ods_path)?)
    }

    pub fn parse(content_xml: &str) -> Result<Self, ImportError> {
        let dom = tl::parse(content_xml, tl::ParserOptions::default())
            .map_err(|e| ImportError::Ods(e.to_string()))?;
        let parser = dom.parser();
        let top: Vec<NodeHandle> = dom.children().to_vec();

        let italic = italic_styles(parser, &top);

        let mut tables = Vec::new();
        collect_tags(parser, &top, &["table:table"], &mut tables);
        let table = match tables.first().and_then(|h| h.get(parser)).and_then(Node::as_tag) {
            Some(table) => table,
            None => return Ok(Self::default()),
        };

        let mut rows = Vec::new();
        collect_tags(parser, &child_handles(table), &["table:table-row"], &mut rows);

        let mut cells = HashMap::new();
        let mut row_number = 1;
        for row in rows.iter().filter_map(|h| h.get(parser)).filter_map(Node::as_tag) {
            let row_repeat = repeat_count(row, "table:number-rows-repeated");

            let mut cell_handles = Vec::new();
            collect_tags(
                parser,
                &child_handles(row),
                &["table:table-cell", "table:covered-table-cell"],
                &mut cell_handles,
            );

            let mut column = 0;
            let mut row_cells = Vec::new();
            for cell in cell_handles.iter().filter_map(|h| h.get(parser)).filter_map(Node::as_tag) {
                let col_repeat = repeat_count(cell, "table:number-columns-repeated");

                let mut html = String::new();
                render(parser, &child_handles(cell), &italic, &mut html);
                let html = html.trim().to_string();
                if !html.is_empty() {
                    for offset in 0..col_repeat.min(MAX_REPEAT) {
                        row_cells.push((column + offset, html.clone()));
                    }
                }
                column += col_repeat;
            }

            if !row_cells.is_empty() {
                for offset in 0..row_repeat.min(MAX_REPEAT) {
                    for (col, html) in &row_cells {
                        cells.insert((row_number + offset, *col), html.clone());
                    }
                }
            }
            row_number += row_repeat;
        }

        debug!("Read {} rich text cells", cells.len());
        Ok(Self { cells })
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.cells.get(&(row, column)).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn tag_name(tag: &HTMLTag) -> String {
    tag.name().as_utf8_str().to_string()
}

fn attribute(tag: &HTMLTag, key: &str) -> Option<String> {
    tag.attributes()
        .get(key)
        .flatten()
        .map(|value| value.as_utf8_str().to_string())
}

fn child_handles(tag: &HTMLTag) -> Vec<NodeHandle> {
    tag.children().top().iter().copied().collect()
}

fn repeat_count(tag: &HTMLTag, key: &str) -> usize {
    attribute(tag, key)
        .and_then(|v| v.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// Depth-first search for tags; matches are not descended into
fn collect_tags(parser: &Parser, handles: &[NodeHandle], names: &[&str], out: &mut Vec<NodeHandle>) {
    for handle in handles {
        if let Some(tag) = handle.get(parser).and_then(Node::as_tag) {
            if names.contains(&tag_name(tag).as_str()) {
                out.push(*handle);
            } else {
                collect_tags(parser, &child_handles(tag), names, out);
            }
        }
    }
}

/// Text styles declaring `fo:font-style="italic"`
fn italic_styles(parser: &Parser, top: &[NodeHandle]) -> HashSet<String> {
    let mut styles = Vec::new();
    collect_tags(parser, top, &["style:style"], &mut styles);

    let mut italic = HashSet::new();
    for style in styles.iter().filter_map(|h| h.get(parser)).filter_map(Node::as_tag) {
        let mut properties = Vec::new();
        collect_tags(parser, &child_handles(style), &["style:text-properties"], &mut properties);

        let is_italic = properties
            .iter()
            .filter_map(|h| h.get(parser))
            .filter_map(Node::as_tag)
            .any(|p| attribute(p, "fo:font-style").as_deref() == Some("italic"));

        if let (true, Some(name)) = (is_italic, attribute(style, "style:name")) {
            italic.insert(name);
        }
    }

    if italic.is_empty() {
        italic.insert(FALLBACK_ITALIC_STYLE.to_string());
    }
    italic
}

fn render(parser: &Parser, handles: &[NodeHandle], italic: &HashSet<String>, out: &mut String) {
    for handle in handles {
        match handle.get(parser) {
            Some(Node::Raw(text)) => out.push_str(&decode_entities(&text.as_utf8_str())),
            Some(Node::Tag(tag)) => match tag_name(tag).as_str() {
                "text:s" => {
                    let count = repeat_count(tag, "text:c");
                    out.push_str(&" ".repeat(count.min(MAX_REPEAT)));
                    render(parser, &child_handles(tag), italic, out);
                }
                "text:tab" | "text:line-break" => out.push(' '),
                "text:span" => {
                    let is_italic = attribute(tag, "text:style-name").is_some_and(|s| italic.contains(&s));
                    if is_italic {
                        out.push_str("<i>");
                    }
                    render(parser, &child_handles(tag), italic, out);
                    if is_italic {
                        out.push_str("</i>");
                    }
                }
                "text:p" => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    render(parser, &child_handles(tag), italic, out);
                }
                // annotations are not cell content
                "office:annotation" => {}
                _ => render(parser, &child_handles(tag), italic, out),
            },
            _ => {}
        }
    }
}

/// Decode the XML predefined and numeric character entities
fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            match entity {
                "amp" => "&".to_string(),
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                _ => {
                    let code = match entity.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse().ok(),
                    };
                    code.and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_else(|| caps[0].to_string())
                }
            }
        })
        .into_owned()
}
