use clap::Parser;
use std::env;
use std::fs;
use std::path::PathBuf;
use xbind::report::{self, AnyType, Entry};
use xbind::{
    BindError, CursorFlags, IncludedTypeMap, ReadOnlyCursor, TypeDescriptor, TypeMapConfig,
    XmlCursor, XmlDocument, compile,
};

#[derive(Parser, Debug)]
#[command(version, about = "Lists the typed nodes an XPath query selects in an XML document")]
struct Args {
    /// XML document to read
    document: PathBuf,

    /// Query evaluated against the document root
    query: String,

    /// JSON type map: { "default_type": "...", "included": { "<xsi:type>": "..." } }
    #[arg(long)]
    types: Option<PathBuf>,

    /// Treat more than one result as ambiguous and list nothing
    #[arg(long, default_value_t = false)]
    single: bool,

    /// Relocate a fresh cursor to the first node and print it again
    #[arg(long, default_value_t = false)]
    revisit: bool,
}

fn main() -> Result<(), BindError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "xbind=info");
        }
    }
    env_logger::init();

    let args = Args::parse();

    let text = fs::read_to_string(&args.document)?;
    let doc = XmlDocument::parse(&text)?;
    let path = compile(&args.query)?;

    // Without a type map every node is listed under one default type.
    let types: Box<dyn IncludedTypeMap> = match &args.types {
        Some(file) => Box::new(TypeMapConfig::from_file(file)?.into_type_set()?),
        None => Box::new(AnyType::new(TypeDescriptor::new("node"))),
    };

    let mut flags = CursorFlags::ALL_NODES | CursorFlags::MULTIPLE;
    if args.single {
        flags.remove(CursorFlags::MULTIPLE);
    }

    let mut cursor = ReadOnlyCursor::new(Some(doc.root_node()), path.clone(), &types, flags)?;
    let entries = report::collect(&mut cursor);
    for entry in &entries {
        println!("{}", entry);
    }
    log::info!("{} node(s) matched '{}'", entries.len(), path);

    if args.revisit {
        cursor.reset()?;
        if cursor.move_next() {
            let snapshot = cursor.save()?;
            let mut fresh = ReadOnlyCursor::new(Some(doc.root_node()), path, &types, flags)?;
            fresh.move_to(&snapshot)?;
            if let Some(entry) = Entry::describe(0, &fresh) {
                println!("revisit\t{}", entry);
            }
        }
    }

    Ok(())
}
