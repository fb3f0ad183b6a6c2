mod client;
mod crawler;
mod error;
mod filmot;
mod helpers;
mod logger;
mod query;

use std::fs::{self, File};
use std::io::Write;

use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};

use client::{SearchClient, SearchRequest};
use crawler::Crawler;
use error::Error;
use filmot::{Channel, FilterSet, SortTarget, VideoRecord};
use helpers::safe_filename;
use logger::{Logger, Logging};
use query::{
    Filters, LicenseType, SortField, SortOption, SortOrder, MAX_DURATION, MAX_LIKES, MAX_VIEWS,
    MIN_DURATION, MIN_LIKES,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Caption text to search for
    query: String,

    /// Channel URL or canonical channel id to restrict results to
    #[arg(long)]
    channel: Option<String>,

    /// Licence to restrict results to
    #[arg(long, value_enum, default_value = "any")]
    license: LicenseType,

    /// Field to sort results by
    #[arg(long, value_enum, default_value = "view-count")]
    sort: SortField,

    /// Sort direction
    #[arg(long, value_enum, default_value = "desc")]
    order: SortOrder,

    /// Only match videos whose title contains this text
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    min_views: Option<u64>,

    #[arg(long)]
    max_views: Option<u64>,

    #[arg(long)]
    min_likes: Option<u64>,

    #[arg(long)]
    max_likes: Option<u64>,

    /// Minimum duration in seconds
    #[arg(long)]
    min_duration: Option<u32>,

    /// Maximum duration in seconds
    #[arg(long)]
    max_duration: Option<u32>,

    /// Earliest upload date, ISO-8601 (e.g. 2020-01-01); needs --end-date
    #[arg(long)]
    start_date: Option<String>,

    /// Latest upload date, ISO-8601; needs --start-date
    #[arg(long)]
    end_date: Option<String>,

    /// Lazily iterate over all result pages instead of only the first
    #[arg(long)]
    all: bool,

    /// Print the filter and sort controls the site offers instead of results
    #[arg(long)]
    show_filters: bool,

    /// Print records as JSON objects
    #[arg(long)]
    json: bool,

    /// Also write the output to a file named after the query
    #[arg(long)]
    save: bool,

    #[arg(short, long, default_value_t = 5)]
    log_level: u8,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Config {
    #[serde(alias = "userAgent")]
    user_agent: String,
}

fn read_config(path: &str, logger: &Logger) -> Config {
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<Config>(&contents) {
            Ok(config) => {
                logger.debug(&format!(
                    "user agent parsed as '{}' from '{path}'",
                    config.user_agent
                ));
                config
            }
            Err(_) => {
                logger.warn(&format!(
                    "config file '{path}' is malformed, using the default user agent"
                ));
                Config {
                    user_agent: "".to_owned(),
                }
            }
        },
        Err(_) => {
            logger.verbose(&format!(
                "no config file at '{path}', using the default user agent"
            ));
            Config {
                user_agent: "".to_owned(),
            }
        }
    }
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, Error> {
    s.parse()
        .map_err(|_| Error::InvalidFilter(format!("'{s}' is not an ISO-8601 date")))
}

/// A range flag given alone pairs with the opposite bound's documented limit.
fn build_filters(args: &Args) -> Result<Filters, Error> {
    let mut filters = Filters::default();
    filters.set_license(args.license);
    if let Some(title) = &args.title {
        filters.set_title(title);
    }
    if args.min_views.is_some() || args.max_views.is_some() {
        filters.set_views(
            args.min_views.unwrap_or(0),
            args.max_views.unwrap_or(MAX_VIEWS),
        )?;
    }
    if args.min_likes.is_some() || args.max_likes.is_some() {
        filters.set_likes(
            args.min_likes.unwrap_or(MIN_LIKES),
            args.max_likes.unwrap_or(MAX_LIKES),
        )?;
    }
    if args.min_duration.is_some() || args.max_duration.is_some() {
        filters.set_duration(
            args.min_duration.unwrap_or(MIN_DURATION),
            args.max_duration.unwrap_or(MAX_DURATION),
        )?;
    }
    match (&args.start_date, &args.end_date) {
        (Some(start), Some(end)) => {
            filters.set_date_range(parse_date(start)?, parse_date(end)?)?;
        }
        (None, None) => {}
        _ => {
            return Err(Error::InvalidFilter(
                "start_date and end_date must be given together".to_owned(),
            ))
        }
    }
    Ok(filters)
}

fn emit(line: &str, sink: &mut Option<File>) -> Result<()> {
    println!("{line}");
    if let Some(file) = sink {
        writeln!(file, "{line}")?;
    }
    Ok(())
}

fn emit_record(record: &VideoRecord, json: bool, sink: &mut Option<File>) -> Result<()> {
    let line = if json {
        serde_json::to_string(record)?
    } else {
        record.to_string()
    };
    emit(&line, sink)
}

fn render_filter_set(filter_set: &FilterSet) -> Vec<String> {
    let mut lines = Vec::new();
    for option in &filter_set.sort_options {
        match &option.target {
            SortTarget::Field { field, order } => {
                lines.push(format!("sort option: {} ({field} {order})", option.text))
            }
            SortTarget::Link(href) => {
                lines.push(format!("sort option: {} -> {href}", option.text))
            }
        }
    }
    if let Some(title) = &filter_set.title {
        lines.push(format!("title filter (default '{}')", title.default));
    }
    for (label, slider) in [
        ("views", &filter_set.views),
        ("likes", &filter_set.likes),
        ("duration", &filter_set.duration),
    ] {
        if let Some(slider) = slider {
            lines.push(format!(
                "{label} slider (default {})",
                slider.default.as_deref().unwrap_or("unknown")
            ));
        }
    }
    if let Some(license) = &filter_set.license {
        for choice in &license.options {
            lines.push(format!(
                "license option: {} = {}{}",
                choice.value.as_deref().unwrap_or("unknown"),
                choice.label,
                if choice.selected { " (selected)" } else { "" }
            ));
        }
    }
    if let Some(start) = &filter_set.start_date {
        lines.push(format!(
            "start date (default {})",
            start.default.as_deref().unwrap_or("unknown")
        ));
    }
    if let Some(end) = &filter_set.end_date {
        lines.push(format!(
            "end date (default {})",
            end.default.as_deref().unwrap_or("unknown")
        ));
    }
    for quick in &filter_set.quick_date_ranges {
        lines.push(format!(
            "quick range: {} (from {})",
            quick.label, quick.start_date
        ));
    }
    lines
}

async fn run(args: &Args, crawler: &Crawler<'_>, logger: &Logger) -> Result<()> {
    let channel_id = match &args.channel {
        Some(channel) if channel.starts_with("http") => {
            let mut handle = Channel::new(channel, crawler);
            logger.verbose(&format!("resolving channel '{}'", handle.url()));
            let channel_id = handle.channel_id(logger).await?.to_owned();
            logger.info(&format!("channel resolved as '{channel_id}'"));
            Some(channel_id)
        }
        Some(channel) => Some(channel.clone()),
        None => None,
    };
    let request = SearchRequest {
        query: args.query.clone(),
        channel_id,
        filters: build_filters(args)?,
        sort: Some(SortOption::new(args.sort, args.order)),
    };
    let client = SearchClient::new(crawler, logger);

    let mut sink = if args.save {
        let path = format!("{}.txt", safe_filename(&args.query, 128));
        logger.info(&format!("saving output to '{path}'"));
        Some(File::create(path)?)
    } else {
        None
    };

    if args.show_filters {
        let filter_set = client.filter_options(&request).await?;
        if args.json {
            emit(&serde_json::to_string_pretty(&filter_set)?, &mut sink)?;
        } else {
            for line in render_filter_set(&filter_set) {
                emit(&line, &mut sink)?;
            }
        }
        return Ok(());
    }

    if args.all {
        let mut pager = client.pages(request);
        while let Some(records) = pager.next_page().await? {
            for record in records {
                emit_record(&record, args.json, &mut sink)?;
            }
        }
    } else {
        for record in client.search(&request).await? {
            emit_record(&record, args.json, &mut sink)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args: Args = Args::parse();
    let logger = Logger::new(args.log_level);
    logger.debug(&format!("args are: {:#?}", args));

    let config = read_config("./config.json", &logger);
    let crawler = Crawler::new(&config.user_agent, &logger);
    if let Err(error) = run(&args, &crawler, &logger).await {
        logger.fatal(&format!("Error: {error:#}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempdir::TempDir;

    use crate::logger::Logger;
    use crate::{build_filters, read_config, Args, Config, MAX_VIEWS};
    use clap::Parser;

    #[test]
    fn read_config_config_not_exist() {
        let temp_dir = TempDir::new("read_config").unwrap();
        let temp_file = temp_dir
            .path()
            .join("non_existing")
            .to_str()
            .unwrap()
            .to_owned();
        let logger = Logger::new(0);
        let config = read_config(&temp_file, &logger);
        assert_eq!(
            config,
            Config {
                user_agent: "".to_owned(),
            },
            "user_agent should be parsed to '' if no config is presented"
        );
    }

    #[test]
    fn read_config_missing_user_agent() {
        let temp_dir = TempDir::new("read_config").unwrap();
        let temp_file = temp_dir
            .path()
            .join("missing_user_agent")
            .to_str()
            .unwrap()
            .to_owned();
        let config_content = "{}";
        fs::write(&temp_file, config_content).expect("Unable to write file");
        let logger = Logger::new(0);
        let config = read_config(&temp_file, &logger);
        assert_eq!(
            config,
            Config {
                user_agent: "".to_owned(),
            },
            "user_agent should be parsed to '' if config does not contain userAgent"
        );
    }

    #[test]
    fn read_config_wrong_user_agent_type() {
        let temp_dir = TempDir::new("read_config").unwrap();
        let temp_file = temp_dir
            .path()
            .join("wrong_type")
            .to_str()
            .unwrap()
            .to_owned();
        let config_content = "{ \"userAgent\": 2 }";
        fs::write(&temp_file, config_content).expect("Unable to write file");
        let logger = Logger::new(0);
        let config = read_config(&temp_file, &logger);
        assert_eq!(
            config,
            Config {
                user_agent: "".to_owned(),
            },
            "user_agent should be parsed to '' if userAgent is not a string"
        );
    }

    #[test]
    fn read_config_success() {
        let temp_dir = TempDir::new("read_config").unwrap();
        let temp_file = temp_dir.path().join("success").to_str().unwrap().to_owned();
        let config_content = "{ \"userAgent\": \"test-agent\" }";
        fs::write(&temp_file, config_content).expect("Unable to write file");
        let logger = Logger::new(0);
        let config = read_config(&temp_file, &logger);
        assert_eq!(
            config,
            Config {
                user_agent: "test-agent".to_owned(),
            },
            "user_agent should be parsed correctly"
        );
    }

    #[test]
    fn build_filters_pairs_lone_range_flags() {
        let args = Args::parse_from(["caption-finder", "rust", "--min-views", "1000"]);
        let filters = build_filters(&args).unwrap();
        let params = filters.to_params();
        assert!(params.contains(&("minViews", "1000".to_owned())));
        assert!(params.contains(&("maxViews", MAX_VIEWS.to_string())));
    }

    #[test]
    fn build_filters_always_carries_the_license() {
        let args = Args::parse_from(["caption-finder", "rust"]);
        let filters = build_filters(&args).unwrap();
        assert!(filters.to_params().contains(&("license", "0".to_owned())));
    }

    #[test]
    fn build_filters_rejects_a_lone_date() {
        let args = Args::parse_from(["caption-finder", "rust", "--start-date", "2020-01-01"]);
        assert!(build_filters(&args).is_err());
    }

    #[test]
    fn build_filters_rejects_a_bad_date() {
        let args = Args::parse_from([
            "caption-finder",
            "rust",
            "--start-date",
            "20th of Jan",
            "--end-date",
            "2020-02-01",
        ]);
        assert!(build_filters(&args).is_err());
    }

    #[test]
    fn build_filters_accepts_a_full_date_range() {
        let args = Args::parse_from([
            "caption-finder",
            "rust",
            "--start-date",
            "2020-01-01",
            "--end-date",
            "2020-02-01",
        ]);
        let filters = build_filters(&args).unwrap();
        let params = filters.to_params();
        assert!(params.contains(&("startDate", "2020-01-01".to_owned())));
        assert!(params.contains(&("endDate", "2020-02-01".to_owned())));
    }
}
