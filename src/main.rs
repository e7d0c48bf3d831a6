mod app;
mod cli;
mod completions;
mod config;
mod db;
mod directory;
mod domain;
mod ids;
mod launch;
mod logging;
mod migration;
mod seed;
mod store;
mod ui;
mod view;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization should work")
    );
}

fn run() -> Result<(), app::AppError> {
    use clap::Parser;
    use cli::Commands;

    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    if let Commands::Completions(args) = &cli.command {
        return completions::run_completions_command(args.shell.as_deref(), args.install);
    }

    let config = config::Config::load(cli.config.as_deref())?;
    let db_path = config.resolve_db_path(cli.db.as_deref());
    let defaults = if config.seed_defaults {
        seed::SeedData::builtin()?
    } else {
        seed::SeedData::empty()
    };
    tracing::debug!(db = %db_path, seed_defaults = config.seed_defaults, "opening link store");
    let mut app = app::App::open(&db_path, defaults)?;
    if app.migrated_on_load() {
        eprintln!("migrated legacy links to category ids");
    }
    let palette = ui::Palette::new(config.color);

    match cli.command {
        Commands::Ls(args) => {
            let query = args.query.unwrap_or_default();
            let groups = app.view(&query);
            if args.json {
                print_json(&groups);
            } else {
                ui::print_view(&groups, app.links().len(), &query, &palette);
            }
        }
        Commands::Add(args) => {
            let category_id = args
                .category
                .as_deref()
                .map(|reference| app.resolve_category(reference))
                .transpose()?;
            let draft = directory::LinkDraft {
                title: args.title,
                url: args.url,
                category_id,
                is_special: Some(args.special),
            };
            let link = app.add_link(draft)?.ok_or_else(|| {
                app::AppError::InvalidArgument("title and url must not be empty".to_string())
            })?;
            println!("added {}", ui::format_link_row(&link, &palette).trim_start());
        }
        Commands::Update(args) => {
            let current = app
                .link(&args.id)
                .cloned()
                .ok_or_else(|| link_not_found(&args.id))?;
            let is_special = args.special_flag();
            let category_id = if args.uncategorized {
                None
            } else {
                match args.category.as_deref() {
                    Some(reference) => Some(app.resolve_category(reference)?),
                    None => current.category_id.clone(),
                }
            };
            let draft = directory::LinkDraft {
                title: args.title.unwrap_or(current.title),
                url: args.url.unwrap_or(current.url),
                category_id,
                is_special,
            };
            let link = app.update_link(&args.id, draft)?.ok_or_else(|| {
                app::AppError::InvalidArgument("title and url must not be empty".to_string())
            })?;
            println!(
                "updated {}",
                ui::format_link_row(&link, &palette).trim_start()
            );
        }
        Commands::Rm(args) => {
            let link = app
                .delete_link(&args.id)?
                .ok_or_else(|| link_not_found(&args.id))?;
            println!("removed {} {}", link.title, palette.id(&link.id));
        }
        Commands::Show(args) => {
            let link = app.link(&args.id).ok_or_else(|| link_not_found(&args.id))?;
            if args.json {
                print_json(link);
            } else {
                let category = link
                    .category_id
                    .as_deref()
                    .and_then(|id| domain::category::find_by_id(app.categories(), id));
                ui::print_link(link, category, &palette);
            }
        }
        Commands::Open(args) => {
            let link = app.link(&args.id).ok_or_else(|| link_not_found(&args.id))?;
            if args.print {
                println!("{}", link.url);
            } else if let Err(err) = launch::open_url(&link.url) {
                tracing::warn!(error = %err, "no url handler could be launched");
                println!("{}", link.url);
            } else {
                println!("opened {}", palette.url(&link.url));
            }
        }
        Commands::Category(args) => run_category_command(&mut app, args.command, &palette)?,
        Commands::Completions(args) => {
            completions::run_completions_command(args.shell.as_deref(), args.install)?
        }
    }

    Ok(())
}

fn run_category_command(
    app: &mut app::App,
    command: cli::CategorySubcommands,
    palette: &ui::Palette,
) -> Result<(), app::AppError> {
    use cli::CategorySubcommands;

    match command {
        CategorySubcommands::Ls(args) => {
            if args.json {
                print_json(&app.categories());
            } else {
                ui::print_categories(app.categories(), app.links(), palette);
            }
        }
        CategorySubcommands::Add(args) => {
            let category = app.add_category(&args.name)?.ok_or_else(|| {
                app::AppError::InvalidArgument("category name must not be empty".to_string())
            })?;
            println!("added category {} {}", category.name, palette.id(&category.id));
        }
        CategorySubcommands::Rename(args) => {
            let id = app.resolve_category(&args.category)?;
            let category = app.rename_category(&id, &args.name)?.ok_or_else(|| {
                app::AppError::InvalidArgument("category name must not be empty".to_string())
            })?;
            println!(
                "renamed category {} to {}",
                palette.id(&category.id),
                category.name
            );
        }
        CategorySubcommands::Rm(args) => {
            let id = app.resolve_category(&args.category)?;
            if !args.yes {
                if !ui::stdin_is_terminal() {
                    return Err(app::AppError::InvalidArgument(
                        "refusing to remove a category without confirmation; pass --yes"
                            .to_string(),
                    ));
                }
                let affected = app
                    .links()
                    .iter()
                    .filter(|link| link.category_id.as_deref() == Some(id.as_str()))
                    .count();
                let question = format!(
                    "remove category '{}'? {} link(s) will become uncategorized",
                    args.category.trim(),
                    affected
                );
                if !ui::confirm(&question)? {
                    println!("category kept");
                    return Ok(());
                }
            }
            let removal = app
                .delete_category(&id)?
                .ok_or_else(|| app::AppError::NotFound {
                    kind: "category",
                    id: id.clone(),
                })?;
            println!(
                "removed category {} {}; {} link(s) moved to {}",
                removal.category.name,
                palette.id(&removal.category.id),
                removal.reassigned.len(),
                view::UNCATEGORIZED_LABEL
            );
        }
    }
    Ok(())
}

fn link_not_found(id: &str) -> app::AppError {
    app::AppError::NotFound {
        kind: "link",
        id: id.to_string(),
    }
}
