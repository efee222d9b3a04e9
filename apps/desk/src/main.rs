use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use quickquote_core::{Section, WizardReply, WizardStep};
use quickquote_desk::cli::{Cli, Command, NewArgs, WizardArgs};
use quickquote_desk::{commands, init_tracing, view, ApiError, App, ConfigState, TerminalNotifier};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let app = match App::start(ConfigState::from_env(), cli.ephemeral).await {
        Ok(app) => app,
        Err(e) => {
            error!("Startup failed: {}", e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = run(&app, cli.command).await;
    app.db.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message);
            ExitCode::FAILURE
        }
    }
}

async fn run(app: &App, command: Command) -> Result<(), ApiError> {
    let notifier = TerminalNotifier;

    match command {
        Command::List => {
            let list = commands::list_quotes(&app.db).await;
            if let Some(warning) = &list.warning {
                eprintln!("warning: {}", warning);
            }
            println!("{}", view::render_quote_list(&list.quotes, &app.config));
        }
        Command::Show { id } => {
            let quote = commands::get_quote(&app.db, &id).await?;
            println!("{}", view::render_quote(&quote, &app.config));
        }
        Command::Delete { id } => {
            commands::delete_quote(&app.db, &notifier, &id).await?;
        }
        Command::New(args) => new_quote(app, args, &notifier).await?,
        Command::Wizard(args) => wizard(app, args, &notifier).await?,
    }

    Ok(())
}

async fn new_quote(app: &App, args: NewArgs, notifier: &TerminalNotifier) -> Result<(), ApiError> {
    commands::new_quote(&app.db, &app.session).await?;
    commands::select_customer(&app.session, &args.customer)?;

    if let Some(name) = &args.name {
        commands::set_estimate_name(&app.session, name)?;
    }
    if let Some(terms) = &args.terms {
        commands::set_payment_terms(&app.session, terms)?;
    }
    for product in args.products {
        commands::add_line_item(&app.session, Section::Products, product.into_draft())?;
    }

    let stored = commands::save_quote(&app.db, &app.session, notifier).await?;
    println!("{}", view::render_quote(&stored, &app.config));
    Ok(())
}

/// Interactive guided entry on stdin.
///
/// Product options can be picked by number or name. `save` stores the quote,
/// `quit` leaves without saving. A failed save keeps the quote open so the
/// user can retry or quit. Closing stdin attempts one final save.
async fn wizard(app: &App, args: WizardArgs, notifier: &TerminalNotifier) -> Result<(), ApiError> {
    match (&args.open, &args.customer) {
        (Some(id), _) => {
            commands::open_quote(&app.db, &app.session, id).await?;
        }
        (None, Some(customer)) => {
            commands::new_quote(&app.db, &app.session).await?;
            commands::select_customer(&app.session, customer)?;
        }
        (None, None) => {
            return Err(ApiError::validation(
                "Pass --customer for a new quote or --open for a saved one",
            ));
        }
    }

    let mut reply = commands::start_wizard(&app.session);
    print_reply(&reply);
    println!("(type 'save' to store the quote, 'quit' to leave without saving)");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let Some(Ok(line)) = lines.next() else {
            return save_and_show(app, notifier).await;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "quit" => {
                commands::discard_quote(&app.session);
                info!("Wizard left without saving");
                return Ok(());
            }
            "save" => match save_and_show(app, notifier).await {
                Ok(()) => return Ok(()),
                Err(_) => {
                    println!("The quote is still open. Type 'save' to try again or 'quit' to leave.");
                    continue;
                }
            },
            _ => {}
        }

        let input = pick_option(&reply, input);
        reply = match commands::wizard_submit(&app.session, &input) {
            Ok(reply) => reply,
            Err(e) => {
                eprintln!("error: {}", e.message);
                continue;
            }
        };
        print_reply(&reply);

        if reply.completed.is_some() {
            if let Some(next) = commands::finish_wizard_run(&app.session, &app.config).await {
                reply = next;
                print_reply(&reply);
            }
        }
    }

}

/// Saves the open quote and prints it. The notifier has already reported a
/// failure, and the editor stays open.
async fn save_and_show(app: &App, notifier: &TerminalNotifier) -> Result<(), ApiError> {
    let stored = commands::save_quote(&app.db, &app.session, notifier).await?;
    println!("{}", view::render_quote(&stored, &app.config));
    Ok(())
}

/// Maps a typed option number to the option it names.
fn pick_option(reply: &WizardReply, input: &str) -> String {
    if reply.step != WizardStep::ChoosingProduct {
        return input.to_string();
    }
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| reply.options.get(i))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

fn print_reply(reply: &WizardReply) {
    println!("{}", reply.message);
    for (i, option) in reply.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
}
