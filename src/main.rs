// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rawgraph CLI entrypoint.
//!
//! Opens a project file, re-acquires every referenced image and prints what the document
//! holds. Use `--thumbnails` to also print each loaded image as a PNG data URI.

use std::error::Error;
use std::path::PathBuf;

use base64::Engine as _;
use rawgraph::editor::{Editor, EditorConfig};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <project.json> [--thumbnails] [--thumbnail-edge <px>] [--verbose]\n\n--thumbnails prints each loaded image as a base64 PNG data URI.\n--thumbnail-edge sets the longest thumbnail edge in pixels (default {}).\n--verbose raises the default log filter to debug; RUST_LOG overrides it.",
        EditorConfig::default().thumbnail_edge
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    project: Option<PathBuf>,
    thumbnails: bool,
    thumbnail_edge: Option<u32>,
    verbose: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--thumbnails" => {
                if options.thumbnails {
                    return Err(());
                }
                options.thumbnails = true;
            }
            "--thumbnail-edge" => {
                if options.thumbnail_edge.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let edge: u32 = raw.parse().map_err(|_| ())?;
                if edge == 0 {
                    return Err(());
                }
                options.thumbnail_edge = Some(edge);
            }
            "--verbose" => {
                if options.verbose {
                    return Err(());
                }
                options.verbose = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.project.is_some() {
                    return Err(());
                }
                options.project = Some(PathBuf::from(arg));
            }
        }
    }

    if options.project.is_none() {
        return Err(());
    }

    Ok(options)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "rawgraph".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        init_logging(options.verbose);

        let mut config = EditorConfig::default();
        if let Some(edge) = options.thumbnail_edge {
            config.thumbnail_edge = edge;
        }
        let project = options.project.ok_or("missing project path")?;
        let (mut editor, report) = Editor::open(&project, config)?;

        let doc = editor.document();
        println!(
            "{} (version {}): {} nodes, {} connections",
            project.display(),
            doc.version(),
            doc.nodes().len(),
            doc.connections().len()
        );
        for (node_id, node) in doc.nodes() {
            let position = node.position();
            let file = node.filepath().unwrap_or("-");
            let handle = node
                .resource_handle()
                .map_or_else(|| "-".to_owned(), |handle| handle.to_string());
            println!(
                "  {node_id} {} at ({}, {}) file={file} handle={handle}",
                node.kind(),
                position.x,
                position.y
            );
        }
        for connection in doc.connections() {
            println!("  {connection}");
        }
        for failure in &report.failures {
            println!(
                "  unloaded: {} ({}): {}",
                failure.node_id,
                failure.path.display(),
                failure.error
            );
        }
        for dropped in &report.displaced {
            println!("  dropped: {dropped}");
        }

        if options.thumbnails {
            let loaded: Vec<_> = doc
                .nodes()
                .iter()
                .filter_map(|(id, node)| node.resource_handle().map(|handle| (id.clone(), handle)))
                .collect();
            let doc = editor.document_mut();
            for (node_id, handle) in loaded {
                let metadata = doc.metadata(handle)?;
                let thumbnail = doc.thumbnail(handle)?;
                let width = metadata.get("width").map_or("?", String::as_str);
                let height = metadata.get("height").map_or("?", String::as_str);
                println!(
                    "{node_id} {width}x{height}: data:image/png;base64,{}",
                    base64::engine::general_purpose::STANDARD.encode(&thumbnail[..])
                );
            }
        }

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("rawgraph: {err}");
        std::process::exit(1);
    }
}
