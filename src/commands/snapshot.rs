//! 导出单个指数的 HTML 快照

use std::fs;
use std::io::{self, Write};

use crate::cli::SnapshotArgs;
use crate::config::AppConfig;
use crate::dashboard::controller::DashboardController;
use crate::dashboard::detail;
use crate::dashboard::surface::HtmlSurface;
use crate::dashboard::view::Node;
use crate::error::RenderError;
use crate::services::api_client::{ApiClient, DataSource};

/// 加载数据并生成页面
///
/// 获取失败时页面中展示对应提示，不视为错误
pub async fn render<D: DataSource>(
    source: &D,
    entity: &str,
    date: Option<&str>,
    developer_mode: bool,
) -> Result<String, RenderError> {
    let mut controller = DashboardController::new(HtmlSurface::new(), developer_mode);
    controller.load_entities(source).await;
    controller.load_series(source, entity, None).await;
    if let Some(date) = date {
        controller.pick_date(date);
    }

    // 每个日期的详情预先渲染，页面内切换日期不需要再请求
    let state = controller.state();
    let dated: Vec<(String, Node)> = state
        .series
        .iter()
        .filter_map(|record| state.fields.date_of(record))
        .filter_map(|day| {
            detail::render_detail(entity, &state.series, &state.fields, Some(day.as_str()))
                .ok()
                .map(|node| (day, node))
        })
        .collect();
    let title = match &state.date {
        Some(day) => format!("{} ({})", entity, day),
        None => entity.to_string(),
    };

    let mut surface = controller.into_surface();
    for (day, node) in dated {
        surface.add_dated_view(&day, node);
    }
    surface.into_document(&title)
}

pub async fn run(mut config: AppConfig, args: &SnapshotArgs) -> anyhow::Result<()> {
    if let Some(base) = &args.api_base {
        config.api.base_url = base.clone();
    }
    if args.developer {
        config.dashboard.developer_mode = true;
    }

    let client = ApiClient::new(&config.api)?;
    let document = render(
        &client,
        &args.entity,
        args.date.as_deref(),
        config.dashboard.developer_mode,
    )
    .await?;

    match &args.output {
        Some(path) => {
            fs::write(path, &document)?;
            log::info!("快照已写入 {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
