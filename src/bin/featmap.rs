use clap::Parser;
use tracing_subscriber::EnvFilter;

use featmap::cli::{self, Format};
use featmap::{MappingDocument, Submission, check, tree};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = cli::Args::parse();
    let config = args.config()?;
    match &args.command {
        cli::Command::Tree {
            input,
            output,
            format,
        } => {
            let reader = input.clone().into_reader()?;
            let document: MappingDocument = serde_json::from_reader(reader)?;
            let nodes = featmap::build_tree(&document, &config)?;
            let mut writer = output.clone().into_writer()?;
            match format {
                Format::Text => featmap::render(&mut writer, &nodes, &document.fields_config)?,
                Format::Json => serde_json::to_writer_pretty(&mut writer, &nodes)?,
            }
        }
        cli::Command::Check { input } => {
            let reader = input.clone().into_reader()?;
            let document: MappingDocument = serde_json::from_reader(reader)?;
            let diagnostics = check::validate(&document, &config);
            for diagnostic in &diagnostics {
                eprintln!("{diagnostic}");
            }
            check::ensure_no_errors(&diagnostics)?;
        }
        cli::Command::Edit {
            leaf,
            name,
            alias,
            enabled,
            use_as_id,
            input,
            output,
        } => {
            let reader = input.clone().into_reader()?;
            let mut raw: serde_json::Value = serde_json::from_reader(reader)?;
            let document: MappingDocument = serde_json::from_value(raw.clone())?;
            let nodes = featmap::build_tree(&document, &config)?;
            let node = tree::find_leaf(&nodes, &config.root_id, leaf)
                .ok_or_else(|| featmap::Error::LeafNotFound(leaf.clone()))?;
            let mut editor = featmap::open_editor(document, &config);
            editor.select_leaf(node)?;
            if let Some(checked) = enabled {
                editor.on_enabled_change(*checked)?;
            }
            if let Some(value) = name {
                editor.on_name_change(value)?;
            }
            if let Some(value) = alias {
                editor.on_alias_change(value)?;
            }
            if let Some(checked) = use_as_id {
                editor.on_use_as_id_change(*checked)?;
            }
            editor.save(&mut |s: &Submission<'_>| s.merge_into(&mut raw))?;
            let mut writer = output.clone().into_writer()?;
            serde_json::to_writer_pretty(&mut writer, &raw)?;
        }
    }
    Ok(())
}
