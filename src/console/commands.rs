//! Console command parsing and execution

use crate::crawler::PipelineHandle;
use crate::state::Villager;

const HELP: &str = "commands:
/ping           check the connection
/fetch          queue farms from the recents feed
/qsize          show the job queue depth
/show           list stored farms
/spider         walk the latest listing page
/spider <page>  walk listing pages from <page> down to 0
/stop           stop running walks
/status         show pipeline status
<farm id>       queue one farm";

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Empty,
    Ping,
    Help,
    Fetch,
    QueueSize,
    Show,
    SpiderLatest,
    SpiderRange(u32),
    InvalidPage(&'a str),
    Stop,
    Status,
    Unknown(&'a str),
    Submit(&'a str),
}

impl<'a> Command<'a> {
    /// Parses a line; anything not starting with `/` is a farm id submission
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();

        match line {
            "" => return Self::Empty,
            "/ping" => return Self::Ping,
            "/help" => return Self::Help,
            "/fetch" => return Self::Fetch,
            "/qsize" => return Self::QueueSize,
            "/show" => return Self::Show,
            "/spider" => return Self::SpiderLatest,
            "/stop" => return Self::Stop,
            "/status" => return Self::Status,
            _ => {}
        }

        if let Some(arg) = line.strip_prefix("/spider ") {
            let arg = arg.trim();
            return match arg.parse::<u32>() {
                Ok(page) => Self::SpiderRange(page),
                Err(_) => Self::InvalidPage(arg),
            };
        }

        if line.starts_with('/') {
            return Self::Unknown(line);
        }

        Self::Submit(line)
    }
}

/// Runs a command and returns the reply, without a trailing newline
pub async fn execute(command: Command<'_>, handle: &PipelineHandle) -> String {
    match command {
        Command::Empty => "/help for help".to_string(),
        Command::Ping => "pong".to_string(),
        Command::Help => HELP.to_string(),
        Command::Fetch => match handle.spider.fetch_recents().await {
            Ok(queued) => format!("fetched recent farms ({} queued)", queued),
            Err(e) => format!("could not fetch recent farms: {}", e),
        },
        Command::QueueSize => format!("queue size is [{}]", handle.queue.len()),
        Command::Show => show(handle),
        Command::SpiderLatest => {
            let _ = handle.spider.start_latest();
            "spidering latest page".to_string()
        }
        Command::SpiderRange(page) => {
            let _ = handle.spider.start_range(page);
            format!("spidering pages {}..0", page)
        }
        Command::InvalidPage(arg) => format!("invalid page number [{}]", arg),
        Command::Stop => {
            handle.spider.request_stop();
            "stop requested".to_string()
        }
        Command::Status => {
            let status = handle.status();
            format!(
                "spiders running [{}], stop requested [{}], queue [{}/{}], farms [{}]",
                status.spiders_running,
                status.stop_requested,
                status.queue_depth,
                status.queue_capacity,
                status.farms
            )
        }
        Command::Unknown(line) => format!("unknown command [{}]", line),
        Command::Submit(entry) => match handle.submit(entry).await {
            Ok(farm_id) => format!("queued farm id {}", farm_id),
            Err(e) => {
                tracing::debug!("rejected console entry [{}]: {}", entry, e);
                "invalid farm id".to_string()
            }
        },
    }
}

fn show(handle: &PipelineHandle) -> String {
    let mut records: Vec<_> = handle.store.snapshot().into_values().collect();
    records.sort_by(|a, b| a.farm_id().cmp(b.farm_id()));

    let mut reply = String::from("stats:");
    for record in records {
        reply.push_str(&format!(
            "\n{} likes Abigail {}/10",
            record.farm_id(),
            record.score(Villager::Abigail)
        ));
    }
    reply
}
