//! hr-console - render an HR page snapshot to stdout

use std::time::Duration;

use clap::{Parser, ValueEnum};
use hr_client::page::{
    ComplaintLogPage, ComplaintStats, EmployeeStats, EmployeesPage, ListController,
    ManagerQueuePage, PayrollPage, PayrollStats, PermissionsPage, RolesPage, TaskBoard,
    UserRolesController, now,
};
use hr_client::{ClientConfig, HrApi, Lang, NetworkHttpClient, NoticeBoard, logger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PageName {
    Employees,
    Payroll,
    Roles,
    Permissions,
    UserRoles,
    Complaints,
    ManagerQueue,
    Tasks,
}

#[derive(Parser, Debug)]
#[command(name = "hr-console")]
#[command(about = "Render an HR page snapshot (statistics and table) as HTML")]
#[command(version)]
struct Cli {
    /// Page to render
    #[arg(value_enum)]
    page: PageName,

    /// Display language (ar, en)
    #[arg(long)]
    lang: Option<Lang>,

    /// Server base URL (overrides HR_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Re-render on the page's refresh interval until Ctrl-C
    #[arg(long)]
    watch: bool,
}

type Api = HrApi<NetworkHttpClient>;

enum Console {
    Employees(ListController<EmployeesPage, NetworkHttpClient>),
    Payroll(ListController<PayrollPage, NetworkHttpClient>),
    Roles(ListController<RolesPage, NetworkHttpClient>),
    Permissions(ListController<PermissionsPage, NetworkHttpClient>),
    UserRoles(UserRolesController<NetworkHttpClient>),
    Complaints(ListController<ComplaintLogPage, NetworkHttpClient>),
    ManagerQueue(ListController<ManagerQueuePage, NetworkHttpClient>),
    Tasks(TaskBoard<NetworkHttpClient>),
}

impl Console {
    fn new(page: PageName, api: Api, notices: NoticeBoard, lang: Lang) -> Self {
        match page {
            PageName::Employees => {
                Console::Employees(ListController::new(EmployeesPage, api, notices, lang))
            }
            PageName::Payroll => {
                Console::Payroll(ListController::new(PayrollPage::new(), api, notices, lang))
            }
            PageName::Roles => Console::Roles(ListController::new(RolesPage, api, notices, lang)),
            PageName::Permissions => {
                Console::Permissions(ListController::new(PermissionsPage, api, notices, lang))
            }
            PageName::UserRoles => Console::UserRoles(UserRolesController::new(api, notices, lang)),
            PageName::Complaints => {
                Console::Complaints(ListController::new(ComplaintLogPage, api, notices, lang))
            }
            PageName::ManagerQueue => Console::ManagerQueue(ListController::new(
                ManagerQueuePage::new(),
                api,
                notices,
                lang,
            )),
            PageName::Tasks => Console::Tasks(TaskBoard::new(api, notices, lang)),
        }
    }

    /// Load and render; the stats line goes first
    async fn snapshot(&self) -> anyhow::Result<String> {
        let out = match self {
            Console::Employees(c) => {
                c.load().await?;
                let stats = EmployeeStats::from_employees(&c.items().await);
                format!("<!-- {stats:?} -->\n{}", c.render().await)
            }
            Console::Payroll(c) => {
                c.load().await?;
                let stats = PayrollStats::from_records(&c.visible().await);
                format!("<!-- {stats:?} -->\n{}", c.render().await)
            }
            Console::Roles(c) => {
                c.load().await?;
                c.render().await.into_string()
            }
            Console::Permissions(c) => {
                c.load().await?;
                c.render().await.into_string()
            }
            Console::UserRoles(c) => {
                c.load().await?;
                c.render().await.into_string()
            }
            Console::Complaints(c) => {
                c.load().await?;
                let stats = ComplaintStats::from_complaints(&c.items().await);
                format!("<!-- {stats:?} -->\n{}", c.render().await)
            }
            Console::ManagerQueue(c) => {
                c.load().await?;
                let stats = c.page().statistics();
                format!("<!-- {stats:?} -->\n{}", c.render().await)
            }
            Console::Tasks(board) => {
                board.load().await?;
                let (new, progress, completed) = board.counts().await;
                format!(
                    "<!-- new={new} progress={progress} completed={completed} -->\n{}",
                    board.render(now()).await
                )
            }
        };
        Ok(out)
    }
}

fn refresh_interval(page: PageName, config: &ClientConfig) -> Duration {
    match page {
        PageName::Payroll => config.poll.payroll,
        PageName::Tasks => config.poll.tasks,
        _ => config.poll.support,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(lang) = cli.lang {
        config.lang = lang;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    logger::init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(page = ?cli.page, base_url = %config.base_url, "hr-console starting");

    let api = HrApi::new(NetworkHttpClient::from_config(&config)?);
    let notices = NoticeBoard::new(config.notice_ttl);
    let console = Console::new(cli.page, api, notices.clone(), config.lang);

    if !cli.watch {
        println!("{}", console.snapshot().await?);
        return Ok(());
    }

    let every = refresh_interval(cli.page, &config);
    loop {
        match console.snapshot().await {
            Ok(html) => println!("{html}"),
            Err(e) => {
                for notice in notices.active() {
                    eprintln!("[{:?}] {}", notice.level, notice.message);
                }
                tracing::warn!(error = %e, "Snapshot failed");
            }
        }
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, exiting");
                break;
            }
            _ = tokio::time::sleep(every) => {}
        }
    }
    Ok(())
}
