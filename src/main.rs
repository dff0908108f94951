use clap::Parser;
use todo_export_rs::addon::html::HtmlAddonOptions;
use todo_export_rs::addon::pdf::{prefetch_font_names, PageKind, PdfAddonOptions};
use todo_export_rs::cli::{run_export, AddonOptions, FilterOptions};
use todo_export_rs::order::ExportOrder;
use todo_export_rs::{get_addon_types, get_export_orders};

use std::fs::File;
use std::io::{self, Read, Write};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Type of output (text, xml, html, pdf)
    #[arg(short = 't', long, value_name = "TYPE", default_value = "text")]
    to_type: String,

    /// Requested export order; format-specific lets the add-on choose
    #[arg(short = 'o', long, value_enum, default_value = "format-specific")]
    order: ExportOrder,

    /// Comma-separated folder ids to include (default: all folders)
    #[arg(long, value_delimiter = ',')]
    folders: Option<Vec<u32>>,
    /// Comma-separated project ids to include (default: all projects)
    #[arg(long, value_delimiter = ',')]
    projects: Option<Vec<u32>>,
    /// Leave out actions that have no project in project-grouped orders
    #[arg(long, default_value_t = false)]
    skip_unfiled: bool,
    /// Export only actions with Open status
    #[arg(long, default_value_t = false)]
    open_only: bool,

    /// Tabular multi-action layout (for html, pdf)
    #[arg(long = "to-compact", default_value_t = false)]
    to_compact: bool,
    /// Document title (for html, pdf)
    #[arg(long = "to-title")]
    to_title: Option<String>,
    /// Page size (for pdf)
    #[arg(long = "to-page", value_enum, default_value = "a4")]
    to_page: PageKind,
    /// Page margin in points (for pdf)
    #[arg(long = "to-margin", default_value_t = 54.0)]
    to_margin: f32,
    /// Base font size in points (for pdf)
    #[arg(long = "to-font-size", default_value_t = 11.0)]
    to_font_size: f32,

    /// Input file with the serialized model (default: stdin)
    input: Option<String>,

    /// Output file (default: stdout)
    output: Option<String>,

    /// List available output types and export orders
    #[arg(short = 'l', long)]
    list_type: bool,

    /// List font names available to the pdf output
    #[arg(long)]
    list_fonts: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list_type {
        println!("type of output:");
        println!("{}", get_addon_types().join(" "));
        println!();
        println!("export orders:");
        println!("{}", get_export_orders().join(" "));
        println!();
        return Ok(());
    }

    if cli.list_fonts {
        if let Some(names) = prefetch_font_names().wait() {
            println!("{}", names.join(" "));
        }
        return Ok(());
    }

    let input = match cli.input {
        Some(path) if path != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            content
        }
    };

    let mut output_writer: Box<dyn Write> = match cli.output {
        Some(path) if path != "-" => Box::new(File::create(path)?),
        _ => Box::new(io::stdout()),
    };

    let to_options = match cli.to_type.as_str() {
        "text" => AddonOptions::Text,
        "xml" => AddonOptions::Xml,
        "html" => AddonOptions::Html(HtmlAddonOptions {
            compact: cli.to_compact,
            title: cli.to_title.clone(),
        }),
        "pdf" => AddonOptions::Pdf(PdfAddonOptions {
            page: cli.to_page,
            margin: cli.to_margin,
            font_size: cli.to_font_size,
            title: cli.to_title.clone(),
            compact: cli.to_compact,
        }),
        _ => anyhow::bail!(
            "Unsupported to_type: {}. Supported types are: {}",
            cli.to_type,
            get_addon_types().join(", ")
        ),
    };

    run_export(
        &input,
        &mut output_writer,
        cli.order,
        to_options,
        FilterOptions {
            folders: cli.folders,
            projects: cli.projects,
            skip_unfiled: cli.skip_unfiled,
            open_only: cli.open_only,
        },
    )?;

    Ok(())
}
