// src/cli.rs

use std::{env, error::Error, fs, path::PathBuf, time::Duration};

use crate::config::consts::{COOKIE_ENV, DEFAULT_POLL_MS, TEAM_PATH_TMPL};
use crate::core::net;
use crate::messaging;
use crate::page::dom::RosterPage;
use crate::page::scan::Annotator;
use crate::page::watch::{self, FileFeed};
use crate::progress::Progress;
use crate::scout::cache::ScoutCache;
use crate::scout::fetch::ScoutFetcher;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Annotate,
    CacheStats,
    ClearCache,
    Ping,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Input {
    None,
    File(PathBuf),
    Team(u32),
}

struct Params {
    command: Command,
    input: Input,
    out: Option<PathBuf>,
    watch: bool,
    interval_ms: u64,
    cookie: Option<String>,
}

impl Params {
    fn new() -> Self {
        Self {
            command: Command::Annotate,
            input: Input::None,
            out: None,
            watch: false,
            interval_ms: DEFAULT_POLL_MS,
            cookie: None,
        }
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let params = parse_cli()?;
    let cache = ScoutCache::open_default();

    match params.command {
        Command::CacheStats => {
            println!("{}", messaging::handle(r#"{"type":"GET_CACHE_STATS"}"#, &cache));
        }
        Command::ClearCache => {
            println!("{}", messaging::handle(r#"{"type":"CLEAR_CACHE"}"#, &cache));
        }
        Command::Ping => {
            println!("{}", messaging::handle(r#"{"type":"PING"}"#, &cache));
        }
        Command::Annotate => annotate(params, cache)?,
    }
    Ok(())
}

fn annotate(params: Params, cache: ScoutCache) -> Result<(), Box<dyn Error>> {
    let cookie = params.cookie.clone().or_else(|| env::var(COOKIE_ENV).ok());
    let mut fetcher = ScoutFetcher::new(cache, cookie.clone());
    let mut annotator = Annotator::new();
    let mut progress = ConsoleProgress::default();

    match params.input {
        Input::None => Err("Specify -f <roster.html> or -t <team-id>".into()),
        Input::Team(id) => {
            let path = TEAM_PATH_TMPL.replace("{id}", &id.to_string());
            let html = net::http_get(&path, cookie.as_deref())?;
            let out = params
                .out
                .unwrap_or_else(|| PathBuf::from(format!("team_{}.scout.html", id)));
            let mut page = RosterPage::parse(&html, 0);
            annotator.scan(&mut page, &mut fetcher, Some(&mut progress));
            fs::write(&out, page.render())?;
            println!("Wrote {}", out.display());
            Ok(())
        }
        Input::File(path) => {
            let out = params.out.unwrap_or_else(|| path.with_extension("scout.html"));
            if params.watch {
                let mut feed = FileFeed::new(&path, Duration::from_millis(params.interval_ms));
                let mut write_out = |page: &RosterPage| {
                    match fs::write(&out, page.render()) {
                        Ok(()) => println!("Wrote {}", out.display()),
                        Err(e) => eprintln!("Write failed: {}", e),
                    }
                };
                watch::run(
                    &mut annotator,
                    &mut feed,
                    &mut fetcher,
                    Some(&mut progress),
                    &mut write_out,
                );
                Ok(())
            } else {
                let html = fs::read_to_string(&path)?;
                let mut page = RosterPage::parse(&html, 0);
                annotator.scan(&mut page, &mut fetcher, Some(&mut progress));
                fs::write(&out, page.render())?;
                println!("Wrote {}", out.display());
                Ok(())
            }
        }
    }
}

fn parse_cli() -> Result<Params, Box<dyn Error>> {
    let mut params = Params::new();

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "-f" | "--file" => {
                let v = args.next().ok_or("Missing value for --file")?;
                params.input = Input::File(PathBuf::from(v));
            }
            "-t" | "--team" => {
                let v: u32 = args.next().ok_or("Missing team id")?.parse()?;
                if v >= 32 { return Err("Team id out of range (0..31)".into()); }
                params.input = Input::Team(v);
            }
            "-o" | "--out" => {
                params.out = Some(PathBuf::from(args.next().ok_or("Missing output path")?));
            }
            "--watch" => params.watch = true,
            "--interval" => {
                params.interval_ms = args.next().ok_or("Missing value for --interval")?.parse()?;
            }
            "--cookie" => params.cookie = Some(args.next().ok_or("Missing cookie value")?),
            "--cache-stats" => params.command = Command::CacheStats,
            "--clear-cache" => params.command = Command::ClearCache,
            "--ping" => params.command = Command::Ping,
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    Ok(params)
}

#[derive(Default)]
struct ConsoleProgress {
    done: usize,
    total: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        println!("Annotating {} player containers…", total);
    }
    fn log(&mut self, msg: &str) {
        println!("  {}", msg);
    }
    fn item_done(&mut self, _player_id: u32) {
        self.done += 1;
    }
    fn finish(&mut self) {
        println!("Done ({}/{})", self.done, self.total);
    }
}
