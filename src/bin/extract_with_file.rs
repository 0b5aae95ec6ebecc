//! Runs the page readers against an HTML file saved from the browser.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use playlist_scout::{
    config::Timeouts,
    discovery::{collect_member_classes, collect_public_classes},
    extractor::{extract, Mode},
    page::snapshot::SnapshotPage,
};

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    PublicClass,
    MemberClass,
    PublicListing,
    MemberListing,
}

#[derive(Parser)]
struct Opts {
    #[arg(value_enum)]
    kind: Kind,
    input_file: PathBuf,
    /// Address the page was saved from.  Relative links are resolved against it.
    #[arg(long, default_value = "https://www.onepeloton.com/classes/cycling")]
    url: String,
    #[arg(long, default_value_t = 10)]
    max_classes: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();
    let page = SnapshotPage::new(&fs_err::read_to_string(&opts.input_file)?, &opts.url);
    let timeouts = Timeouts::default();
    let output = match opts.kind {
        Kind::PublicClass => serde_json::to_string_pretty(&extract(&page, Mode::Public, &timeouts))?,
        Kind::MemberClass => serde_json::to_string_pretty(&extract(&page, Mode::Member, &timeouts))?,
        Kind::PublicListing => serde_json::to_string_pretty(&collect_public_classes(
            &page,
            &timeouts,
            opts.max_classes,
        )?)?,
        Kind::MemberListing => serde_json::to_string_pretty(&collect_member_classes(
            &page,
            &timeouts,
            opts.max_classes,
        )?)?,
    };
    println!("{output}");
    Ok(())
}
