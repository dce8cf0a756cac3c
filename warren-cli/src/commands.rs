use crate::args::{
    Cli, Command, CreateArgs, DeleteArgs, ListArgs, ReadOptions, RelationshipArg, ShowArgs, UpdateArgs,
    WriteOptions,
};
use crate::output::{detail, print_json, resource_fields, resource_table, sparse_table};
use crate::settings::Settings;
use anyhow::Context;
use serde_json::Value;
use warren::model::document::Document;
use warren::model::payload::ResourcePayload;
use warren::operation::{Client, Transport};
use warren::query::Query;
use warren::render::{render, SparseFields};

/// Attributes tried for relationship labels when `--label` is not given.
pub const DEFAULT_LABELS: &[&str] = &["name", "title", "display-name", "company-name"];

pub fn run<T: Transport>(cli: &Cli, settings: &Settings, client: &Client<T>) -> anyhow::Result<()> {
    match &cli.command {
        Command::List(args) => list(cli, settings, client, args),
        Command::Show(args) => show(cli, client, args),
        Command::Create(args) => create(cli, client, args),
        Command::Update(args) => update(cli, client, args),
        Command::Delete(args) => delete(client, args),
    }
}

/// The resource type a path addresses, e.g. `projects` for `v2/projects`.
fn path_type(path: &str) -> &str { path.trim_end_matches('/').rsplit('/').next().unwrap_or(path) }

fn read_query(query: &mut Query, path: &str, read: &ReadOptions) -> Option<SparseFields> {
    query.include(&read.include);
    let sparse = SparseFields::from_flag(read.fields.as_deref());
    if let Some(fields) = &sparse {
        query.fields(path_type(path), fields.names());
    }
    sparse
}

fn labels(read: &ReadOptions) -> Vec<&str> {
    if read.label.is_empty() {
        DEFAULT_LABELS.to_vec()
    } else {
        read.label.iter().map(String::as_str).collect()
    }
}

fn print_document(
    cli: &Cli, doc: &Document, read: &ReadOptions, sparse: Option<&SparseFields>, single: bool,
) -> anyhow::Result<()> {
    if let Some(fields) = sparse {
        let projection = render(doc, fields);
        return match (cli.json, single) {
            (true, true) => print_json(&projection.rows.first()),
            (true, false) => print_json(&projection.rows),
            (false, _) => {
                println!("{}", sparse_table(&projection).render());
                Ok(())
            },
        };
    }

    if cli.json {
        return print_json(doc.data());
    }
    let index = doc.index();
    let labels = labels(read);
    match (single, doc.resources().first()) {
        (true, Some(resource)) => println!("{}", detail(&resource_fields(resource, &index, &labels))),
        _ => println!("{}", resource_table(doc.resources(), &index, &labels).render()),
    }
    Ok(())
}

fn list<T: Transport>(
    cli: &Cli, settings: &Settings, client: &Client<T>, args: &ListArgs,
) -> anyhow::Result<()> {
    let mut query = Query::new();
    query
        .filters(args.filters.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .sort(args.sort.as_deref().unwrap_or_default())
        .limit(args.limit.unwrap_or(settings.page_limit))
        .offset(args.offset);
    let sparse = read_query(&mut query, &args.path, &args.read);

    let doc = if args.all {
        fetch_all(client, &args.path, &query)?
    } else {
        client.fetch_collection(&args.path, &query)?
    };
    print_document(cli, &doc, &args.read, sparse.as_ref(), false)
}

/// Every page of a collection merged into one document. `next` links are
/// followed while the server sends them; a server that sends none is paged
/// by offset until a short page comes back.
fn fetch_all<T: Transport>(client: &Client<T>, path: &str, query: &Query) -> anyhow::Result<Document> {
    let mut page = client.fetch_collection(path, query)?;
    let mut resources = page.resources().to_vec();
    let mut included = page.included().to_vec();
    let mut offsets = query.clone();
    let mut linked = false;
    loop {
        let next = match client.fetch_next(&page)? {
            Some(next) => {
                linked = true;
                next
            },
            None if linked => break,
            None => match offsets.page.next(page.resources().len()) {
                Some(next_page) => {
                    debug!("no next link on {}, requesting offset {}", path, next_page.offset);
                    offsets.page = next_page;
                    client.fetch_collection(path, &offsets)?
                },
                None => break,
            },
        };
        resources.extend_from_slice(next.resources());
        included.extend_from_slice(next.included());
        page = next;
    }
    Ok(Document::multiple_resources(resources, included))
}

fn show<T: Transport>(cli: &Cli, client: &Client<T>, args: &ShowArgs) -> anyhow::Result<()> {
    let mut query = Query::new();
    let sparse = read_query(&mut query, &args.path, &args.read);
    let doc = client
        .fetch_single(&args.path, &args.id, &query)
        .with_context(|| format!("cannot show {}/{}", args.path, args.id))?;
    print_document(cli, &doc, &args.read, sparse.as_ref(), true)
}

/// `--attr` values that parse as JSON are sent as JSON; the rest as strings.
fn attribute_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn apply(payload: &mut ResourcePayload, write: &WriteOptions) {
    for (key, value) in &write.attributes {
        payload.attribute(key, attribute_value(value));
    }
    for relationship in &write.relationships {
        match relationship {
            RelationshipArg::ToOne { name, ty, id } => payload.relationship_if_present(name, ty, id),
            RelationshipArg::ToMany { name, ty, ids } => payload.relationship_list(name, ty, ids),
            RelationshipArg::Clear { name } => payload.clear_relationship(name),
        };
    }
}

fn print_written(cli: &Cli, doc: &Document) -> anyhow::Result<()> {
    if cli.json {
        return print_json(doc.data());
    }
    let index = doc.index();
    if let Some(resource) = doc.resources().first() {
        println!("{}", detail(&resource_fields(resource, &index, DEFAULT_LABELS)));
    }
    Ok(())
}

fn create<T: Transport>(cli: &Cli, client: &Client<T>, args: &CreateArgs) -> anyhow::Result<()> {
    let mut payload = ResourcePayload::new(&args.ty);
    apply(&mut payload, &args.write);
    let doc = client.create(&args.path, &payload).with_context(|| format!("cannot create {}", args.ty))?;
    print_written(cli, &doc)
}

fn update<T: Transport>(cli: &Cli, client: &Client<T>, args: &UpdateArgs) -> anyhow::Result<()> {
    let mut payload = ResourcePayload::update(&args.ty, &args.id);
    apply(&mut payload, &args.write);
    if payload.is_empty() {
        anyhow::bail!("nothing to update: pass at least one --attr or --rel");
    }
    let doc = client
        .update(&args.path, &args.id, &payload)
        .with_context(|| format!("cannot update {}/{}", args.ty, args.id))?;
    print_written(cli, &doc)
}

fn delete<T: Transport>(client: &Client<T>, args: &DeleteArgs) -> anyhow::Result<()> {
    client.delete(&args.path, &args.id).with_context(|| format!("cannot delete {}/{}", args.path, args.id))?;
    println!("deleted {}/{}", args.path, args.id);
    Ok(())
}
