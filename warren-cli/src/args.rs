use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "warren", version, about = "List, show and edit resources of a JSON:API server")]
pub struct Cli {
    /// Server root; resource paths are resolved against it
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,
    /// Settings file [default: warren.toml]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,
    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a resource collection
    List(ListArgs),
    /// Fetch one resource
    Show(ShowArgs),
    /// Create a resource
    Create(CreateArgs),
    /// Update attributes or relationships of a resource
    Update(UpdateArgs),
    /// Delete a resource
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct ReadOptions {
    /// Only these attributes and relationships, in this order
    #[arg(long, value_name = "A,B")]
    pub fields: Option<String>,
    /// Relationship paths to include
    #[arg(long, value_name = "REL", value_delimiter = ',')]
    pub include: Vec<String>,
    /// Attributes tried, in order, to label related resources
    #[arg(long, value_name = "ATTR", value_delimiter = ',')]
    pub label: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub path: String,
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
    /// Follow `next` links until the last page
    #[arg(long)]
    pub all: bool,
    #[command(flatten)]
    pub read: ReadOptions,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub path: String,
    pub id: String,
    #[command(flatten)]
    pub read: ReadOptions,
}

#[derive(Debug, Args)]
pub struct WriteOptions {
    /// Attribute to set; a value that parses as JSON is sent as JSON
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,
    /// `name=type:id` (to-one), `name=type:id,id` or `name=type:` (to-many),
    /// `name=` (clear)
    #[arg(long = "rel", value_name = "NAME=TYPE:ID", value_parser = parse_relationship)]
    pub relationships: Vec<RelationshipArg>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub path: String,
    #[arg(value_name = "TYPE")]
    pub ty: String,
    #[command(flatten)]
    pub write: WriteOptions,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub path: String,
    #[arg(value_name = "TYPE")]
    pub ty: String,
    pub id: String,
    #[command(flatten)]
    pub write: WriteOptions,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub path: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipArg {
    ToOne { name: String, ty: String, id: String },
    ToMany { name: String, ty: String, ids: Vec<String> },
    Clear { name: String },
}

pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{}`", raw)),
    }
}

/// `--attr` pairs; the resource object members JSON:API reserves are refused.
pub fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    let (key, value) = parse_key_value(raw)?;
    match key.as_str() {
        "id" | "type" | "links" | "relationships" => {
            Err(format!("`{}` is not an attribute name; it is reserved by JSON:API", key))
        },
        _ => Ok((key, value)),
    }
}

pub fn parse_relationship(raw: &str) -> Result<RelationshipArg, String> {
    let (name, target) = parse_key_value(raw)?;
    let target = target.trim();
    if target.is_empty() {
        return Ok(RelationshipArg::Clear { name });
    }
    let (ty, ids) = match target.split_once(':') {
        Some((ty, ids)) if !ty.trim().is_empty() => (ty.trim().to_string(), ids),
        _ => return Err(format!("expected NAME=TYPE:ID, got `{}`", raw)),
    };
    let ids: Vec<String> =
        ids.split(',').map(str::trim).filter(|id| !id.is_empty()).map(String::from).collect();
    match ids.len() {
        1 if !target.contains(',') => {
            Ok(RelationshipArg::ToOne { name, ty, id: ids.into_iter().next().unwrap_or_default() })
        },
        _ => Ok(RelationshipArg::ToMany { name, ty, ids }),
    }
}
