//! 终端看板
//!
//! 标准输入读取命令，数据请求在后台任务中完成，结果通过通道回到主循环。
//! 同一时刻只采用最新一次选择的响应

use std::io::{self, Stdout};

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::BrowseArgs;
use crate::config::AppConfig;
use crate::dashboard::controller::{DashboardController, SeriesRequest};
use crate::dashboard::surface::TerminalSurface;
use crate::error::FetchError;
use crate::services::api_client::{ApiClient, DataSource};

const HELP: &str = "\
Commands:
  search <text> | /<text>   filter the company list (empty clears)
  list                      show the company list again
  select <n|name>           open a company (n is the position in the list)
  date <yyyy-mm-dd>         show another date from the loaded records
  fetch <yyyy-mm-dd>        reload the selected company for one date
  reload                    fetch the company list again
  help                      show this help
  quit                      exit";

type Controller = DashboardController<TerminalSurface<Stdout>>;

/// 后台请求的结果
enum Event {
    Entities(Result<Value, FetchError>),
    Series(SeriesRequest, Result<Value, FetchError>),
}

/// 用户命令
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Help,
    Quit,
    List,
    Reload,
    Search(String),
    Select(String),
    Date(String),
    Fetch(String),
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if let Some(query) = line.strip_prefix('/') {
            return Some(Command::Search(query.trim().to_string()));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "list" | "ls" => Command::List,
            "reload" => Command::Reload,
            "search" => Command::Search(rest.to_string()),
            "select" | "open" if !rest.is_empty() => Command::Select(rest.to_string()),
            "date" if !rest.is_empty() => Command::Date(rest.to_string()),
            "fetch" if !rest.is_empty() => Command::Fetch(rest.to_string()),
            _ => Command::Unknown(line.to_string()),
        };
        Some(command)
    }
}

/// 按序号（从 1 开始，对应当前可见列表）或名称（不区分大小写）查找公司
fn resolve_entity(controller: &Controller, target: &str) -> Option<String> {
    if let Ok(position) = target.parse::<usize>() {
        if let Some(name) = position
            .checked_sub(1)
            .and_then(|i| controller.visible_entities().get(i).copied())
        {
            return Some(name.clone());
        }
    }
    controller
        .state()
        .entities
        .iter()
        .find(|name| name.eq_ignore_ascii_case(target))
        .cloned()
}

fn spawn_entities(client: &ApiClient, tx: &mpsc::UnboundedSender<Event>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.entities().await;
        if tx.send(Event::Entities(result)).is_err() {
            log::debug!("主循环已退出，丢弃公司列表响应");
        }
    });
}

fn spawn_series(
    controller: &mut Controller,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<Event>,
    entity: &str,
    date: Option<&str>,
) {
    let request = controller.begin_series(entity, date);
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.series(&request.entity, request.date.as_deref()).await;
        if tx.send(Event::Series(request, result)).is_err() {
            log::debug!("主循环已退出，丢弃记录响应");
        }
    });
}

pub async fn run(mut config: AppConfig, args: &BrowseArgs) -> anyhow::Result<()> {
    if let Some(base) = &args.api_base {
        config.api.base_url = base.clone();
    }
    if args.developer {
        config.dashboard.developer_mode = true;
    }

    let client = ApiClient::new(&config.api)?;
    log::info!("连接数据接口: {}", client.base());

    let mut controller = DashboardController::new(
        TerminalSurface::new(io::stdout()),
        config.dashboard.developer_mode,
    );
    controller.surface_mut().notice(HELP)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_entities(&client, &tx);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line,
                    None => break,
                };
                let command = match Command::parse(&line) {
                    Some(command) => command,
                    None => continue,
                };
                match command {
                    Command::Help => controller.surface_mut().notice(HELP)?,
                    Command::Quit => break,
                    Command::List => {
                        let query = controller.state().filter.clone();
                        controller.set_filter(&query);
                    }
                    Command::Reload => spawn_entities(&client, &tx),
                    Command::Search(query) => controller.set_filter(&query),
                    Command::Select(target) => match resolve_entity(&controller, &target) {
                        Some(entity) => spawn_series(&mut controller, &client, &tx, &entity, None),
                        None => controller
                            .surface_mut()
                            .notice(&format!("Unknown company: {}", target))?,
                    },
                    Command::Date(date) => {
                        if controller.state().selected.is_some() {
                            controller.pick_date(&date);
                        } else {
                            controller.surface_mut().notice("Select a company first")?;
                        }
                    }
                    Command::Fetch(date) => match controller.state().selected.clone() {
                        Some(entity) => spawn_series(&mut controller, &client, &tx, &entity, Some(&date)),
                        None => controller.surface_mut().notice("Select a company first")?,
                    },
                    Command::Unknown(input) => controller
                        .surface_mut()
                        .notice(&format!("Unknown command: {} (type help)", input))?,
                }
            }
            Some(event) = rx.recv() => match event {
                Event::Entities(result) => controller.apply_entities(result),
                Event::Series(request, result) => {
                    controller.apply_series(request, result);
                }
            },
        }
    }

    log::info!("退出终端看板");
    Ok(())
}
