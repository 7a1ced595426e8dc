// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use buzon_app::{AppCommand, AppState, Route};
use buzon_store::MessageStore;
use config::Config;
use runtime::StoreRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `buzon --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let data_path = config.data_path()?;
    if options.print_data_path {
        println!("{}", data_path.display());
        return Ok(());
    }

    let store = if options.demo {
        let store = MessageStore::open_memory();
        buzon_store::seed_demo_messages(&store)?;
        store
    } else {
        MessageStore::open(&data_path).with_context(|| {
            format!(
                "open data file {} -- if this path is wrong, set [storage].data_path or BUZON_CONFIG_PATH",
                data_path.display()
            )
        })?
    };

    if options.check_only {
        return Ok(());
    }

    let mut state = AppState {
        sort_ascending: config.sort_ascending(),
        ..AppState::default()
    };
    if let Some(fragment) = &options.route {
        state.dispatch(AppCommand::Navigate(Route::parse(fragment)));
    }

    let mut runtime = StoreRuntime::new(&store, config.credentials());
    buzon_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    route: Option<String>,
    print_config_path: bool,
    print_data_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        route: None,
        print_config_path: false,
        print_data_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--route" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--route requires a fragment value"))?;
                options.route = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_data_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("buzon");
    println!("  --config <path>          Use a specific config path");
    println!("  --route <fragment>       Start at a route (e.g. admin-panel)");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved data file path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with seeded sample messages (in-memory)");
    println!("  --check                  Validate config + storage and exit");
    println!("  --help                   Show this help");
}
