//! `cube`: card lookups and deck/collection conversion from the command line.

mod cli;
mod error;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cube_config::Config;
use cube_extract::models::CardId;
use cube_fetch::HttpFetcher;
use cube_library::{CardMetadataResolver, CollectionFileCodec, Converter, DeckFileCodec};
use exn::ResultExt;

use crate::cli::{Cli, Command, FileAction};
use crate::error::{ErrorKind, Result};

type Resolver = CardMetadataResolver<HttpFetcher>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.init_logging();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(cache_dir) = cli.cache_dir {
        config.cache_dir = cache_dir;
    }
    let fetcher = HttpFetcher::new(&config.source.url_template, config.timeout(), config.source.user_agent.as_deref())
        .or_raise(|| ErrorKind::Source)?;
    let mut resolver = CardMetadataResolver::new(fetcher, &config.cache_dir).with_image_host(&config.source.image_host);
    let converter = Converter::new(
        DeckFileCodec::new(&config.deck.location),
        CollectionFileCodec::new(config.collection.rating),
    );

    match cli.command {
        Command::Card { ids } => each(&ids, |id| {
            match resolver.card(id).or_raise(|| ErrorKind::Lookup)? {
                Some(card) => println!("{card}"),
                None => println!("{id}: not found"),
            }
            Ok(())
        }),
        Command::Name { ids } => each(&ids, |id| {
            println!("{id}: {}", resolver.name(id).or_raise(|| ErrorKind::Lookup)?);
            Ok(())
        }),
        Command::Colors { ids } => each(&ids, |id| {
            println!("{id}: {}", resolver.color_identity(id).or_raise(|| ErrorKind::Lookup)?);
            Ok(())
        }),
        Command::Printings { ids } => each(&ids, |id| {
            let printings = resolver.printings(id).or_raise(|| ErrorKind::Lookup)?;
            let printings: Vec<String> = printings.iter().map(CardId::to_string).collect();
            println!("{id}: {}", printings.join(" "));
            Ok(())
        }),
        Command::Deck { action } => match action {
            FileAction::Import { file } => print_ids(&converter.deck.import_file(&file).or_raise(|| ErrorKind::File)?),
            FileAction::Export { output, ids } => {
                converter.deck.export_file(&output, &card_ids(&ids), &mut resolver).or_raise(|| ErrorKind::File)?;
                Ok(())
            },
        },
        Command::Collection { action } => match action {
            FileAction::Import { file } => {
                print_ids(&converter.collection.import_file(&file).or_raise(|| ErrorKind::File)?)
            },
            FileAction::Export { output, ids } => {
                converter.collection.export_file(&output, &card_ids(&ids)).or_raise(|| ErrorKind::File)?;
                Ok(())
            },
        },
        Command::Convert { input, output } => convert(&converter, &input, &output, &mut resolver),
    }
}

fn convert(converter: &Converter, input: &Path, output: &Path, resolver: &mut Resolver) -> Result<()> {
    let count = converter.convert(input, output, resolver).or_raise(|| ErrorKind::File)?;
    tracing::info!(cards = count, "Converted {} to {}", input.display(), output.display());
    Ok(())
}

fn card_ids(raw: &[u64]) -> Vec<CardId> {
    raw.iter().copied().map(CardId).collect()
}

fn each(raw: &[u64], mut lookup: impl FnMut(CardId) -> Result<()>) -> Result<()> {
    card_ids(raw).into_iter().try_for_each(|id| lookup(id))
}

fn print_ids(ids: &[CardId]) -> Result<()> {
    for id in ids {
        println!("{id}");
    }
    Ok(())
}
