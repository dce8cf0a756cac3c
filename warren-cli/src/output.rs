//! Tables and detail views for documents, plus pretty JSON.

use serde::Serialize;
use unicode_width::UnicodeWidthStr;
use warren::display::{format_any_value, format_optional, format_related, truncate};
use warren::model::relationship::Relationship;
use warren::model::resource::{IdentifierData, Resource};
use warren::render::SparseProjection;
use warren::resolve::IncludedIndex;

const MAX_CELL: usize = 48;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Debug, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self { Self { headers, rows: Vec::new() } }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row.into_iter().map(|c| truncate(&c, MAX_CELL)).collect())
    }

    /// Left-aligned columns separated by two spaces, sized by display width.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.width());
                }
            }
        }

        let line = |cells: &[String]| {
            let mut out = String::new();
            for (i, width) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                out.push_str(cell);
                if i + 1 < widths.len() {
                    out.push_str(&" ".repeat(width - cell.width() + 2));
                }
            }
            out.trim_end().to_string()
        };

        let mut lines = vec![line(self.headers.as_slice())];
        lines.extend(self.rows.iter().map(|row| line(row.as_slice())));
        lines.join("\n")
    }
}

/// Display text for one relationship: labels of the resolved targets,
/// `-` for a null linkage and `[]` for an empty to-many one.
pub fn relationship_cell(
    index: &IncludedIndex<'_>, relationship: &Relationship, labels: &[&str],
) -> String {
    match &relationship.data {
        IdentifierData::Single(None) => "-".to_string(),
        IdentifierData::Multiple(ids) if ids.is_empty() => "[]".to_string(),
        IdentifierData::Single(Some(_)) => {
            let resolved = index.resolve_to_one(Some(relationship), labels);
            format_related(&resolved.label, &resolved.id)
        },
        IdentifierData::Multiple(_) => index
            .resolve_many_labels(Some(relationship), labels)
            .iter()
            .map(|r| r.label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// The generic projection: id, type, every attribute and every relationship,
/// each group sorted by name.
pub fn resource_fields(
    resource: &Resource, index: &IncludedIndex<'_>, labels: &[&str],
) -> Vec<(String, String)> {
    let mut fields =
        vec![("id".to_string(), resource.id.clone()), ("type".to_string(), resource.ty.clone())];
    let mut attributes: Vec<_> = (&resource.attributes).into_iter().collect();
    attributes.sort_by(|a, b| a.0.cmp(b.0));
    fields.extend(attributes.into_iter().map(|(k, v)| (k.clone(), format_any_value(v))));
    let mut relationships: Vec<_> = resource.relationships.iter().collect();
    relationships.sort_by(|a, b| a.0.cmp(b.0));
    fields.extend(
        relationships.into_iter().map(|(k, r)| (k.clone(), relationship_cell(index, r, labels))),
    );
    fields
}

/// One column per field name seen on any resource, in first-seen order.
pub fn resource_table(resources: &[Resource], index: &IncludedIndex<'_>, labels: &[&str]) -> Table {
    let rows: Vec<Vec<(String, String)>> =
        resources.iter().map(|r| resource_fields(r, index, labels)).collect();
    let mut headers: Vec<String> = Vec::new();
    for row in &rows {
        for (name, _) in row {
            if !headers.contains(name) {
                headers.push(name.clone());
            }
        }
    }
    let mut table = Table::new(headers.iter().map(|h| h.to_uppercase()).collect());
    for row in rows {
        let cell = |header: &String| row.iter().find(|(name, _)| name == header).map(|(_, v)| v.clone());
        table.push(headers.iter().map(|h| cell(h).unwrap_or_default()).collect());
    }
    table
}

/// `name: value` lines, names padded to a common width.
pub fn detail(fields: &[(String, String)]) -> String {
    let width = fields.iter().map(|(name, _)| name.width()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(name, value)| {
            format!("{}:{}{}", name, " ".repeat(width - name.width() + 1), format_optional(value))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sparse_table(projection: &SparseProjection) -> Table {
    let columns = projection.columns();
    let mut headers = vec!["ID".to_string()];
    headers.extend(columns.iter().map(|c| c.to_uppercase()));
    let mut table = Table::new(headers);
    for row in &projection.rows {
        let mut cells = vec![row.id.clone()];
        cells.extend(
            columns.iter().map(|c| row.get(c).map(|v| v.display()).unwrap_or_else(|| "-".to_string())),
        );
        table.push(cells);
    }
    table
}
