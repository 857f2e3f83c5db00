/// Command system for TEA pattern
///
/// Commands represent side effects that should be executed as a result of
/// model updates. They run asynchronously and report back through messages.

use crate::api::{ApiClient, ApiError, HistoryQuery, NewAlert, ProductQuery};
use crate::report::DashboardReport;
use crate::tea::message::{DataMessage, Message, NotificationMessage, ToastLevel};
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Command that can be executed to perform side effects
#[derive(Debug)]
pub enum Command {
    /// Run commands one after another
    Batch(Vec<Command>),

    /// Remote API requests
    Api(ApiCommand),

    /// File system operations
    FileSystem(FileSystemCommand),

    /// System operations
    System(SystemCommand),
}

/// API request commands; each answers with one `DataMessage`
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCommand {
    LoadStats,
    LoadCategories,
    LoadBrands,
    LoadProducts { request: u64, query: ProductQuery },
    /// Product then its history
    LoadProductDetail { product_id: i64, history_days: u32 },
    CompareProduct(i64),
    CreateAlert(NewAlert),
}

/// File system operation commands
#[derive(Debug)]
pub enum FileSystemCommand {
    /// Write the HTML dashboard snapshot
    ExportReport { path: PathBuf, report: Box<DashboardReport> },
}

/// System operation commands
#[derive(Debug, Clone, PartialEq)]
pub enum SystemCommand {
    /// Open external URL
    OpenURL(String),
}

/// Command executor that processes commands asynchronously
#[derive(Clone)]
pub struct CommandExecutor {
    client: ApiClient,
    message_sender: mpsc::UnboundedSender<Message>,
}

impl CommandExecutor {
    /// Create a new command executor
    pub fn new(client: ApiClient, message_sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            client,
            message_sender,
        }
    }

    fn send(&self, message: Message) {
        if let Err(e) = self.message_sender.send(message) {
            tracing::error!("Failed to send message: {}", e);
        }
    }

    /// Execute a command; batched commands run in order, one at a time
    pub async fn execute(&self, command: Command) {
        let mut queue = VecDeque::from([command]);
        while let Some(command) = queue.pop_front() {
            match command {
                Command::Batch(commands) => {
                    for cmd in commands.into_iter().rev() {
                        queue.push_front(cmd);
                    }
                }
                Command::Api(api_command) => {
                    let message = self.execute_api_command(api_command).await;
                    self.send(Message::Data(message));
                }
                Command::FileSystem(fs_command) => {
                    self.execute_filesystem_command(fs_command).await;
                }
                Command::System(sys_command) => {
                    self.execute_system_command(sys_command);
                }
            }
        }
    }

    /// Perform one API request and wrap its outcome
    pub async fn execute_api_command(&self, command: ApiCommand) -> DataMessage {
        match command {
            ApiCommand::LoadStats => DataMessage::StatsLoaded(
                self.client
                    .stats()
                    .await
                    .map_err(|e| log_failure("loading stats", e)),
            ),
            ApiCommand::LoadCategories => DataMessage::CategoriesLoaded(
                self.client
                    .categories()
                    .await
                    .map_err(|e| log_failure("loading categories", e)),
            ),
            ApiCommand::LoadBrands => DataMessage::BrandsLoaded(
                self.client
                    .brands()
                    .await
                    .map_err(|e| log_failure("loading brands", e)),
            ),
            ApiCommand::LoadProducts { request, query } => DataMessage::ProductsLoaded {
                request,
                result: self
                    .client
                    .products(&query)
                    .await
                    .map_err(|e| log_failure("loading products", e)),
            },
            ApiCommand::LoadProductDetail {
                product_id,
                history_days,
            } => {
                let result = async {
                    let detail = self.client.product(product_id).await?;
                    let history = self
                        .client
                        .price_history(product_id, &HistoryQuery::days(history_days))
                        .await?;
                    Ok::<_, ApiError>((Box::new(detail), history))
                }
                .await;
                DataMessage::DetailLoaded(result.map_err(|e| log_failure("loading product detail", e)))
            }
            ApiCommand::CompareProduct(product_id) => DataMessage::ComparisonLoaded(
                self.client
                    .compare(product_id)
                    .await
                    .map_err(|e| log_failure("loading comparison", e)),
            ),
            ApiCommand::CreateAlert(alert) => DataMessage::AlertCreated(
                self.client
                    .create_alert(&alert)
                    .await
                    .map_err(|e| log_failure("creating alert", e)),
            ),
        }
    }

    /// Execute filesystem command
    async fn execute_filesystem_command(&self, command: FileSystemCommand) {
        match command {
            FileSystemCommand::ExportReport { path, report } => {
                let html = report.render_html();
                let result = tokio::fs::write(&path, html)
                    .await
                    .map(|_| path.clone())
                    .map_err(|e| {
                        tracing::error!("Error writing report {}: {}", path.display(), e);
                        e.to_string()
                    });
                self.send(Message::Data(DataMessage::ReportExported(result)));
            }
        }
    }

    /// Execute system command
    fn execute_system_command(&self, command: SystemCommand) {
        match command {
            SystemCommand::OpenURL(url) => {
                if let Err(e) = webbrowser::open(&url) {
                    tracing::warn!("Failed to open {}: {}", url, e);
                    self.send(Message::Notification(NotificationMessage::ShowToast(
                        format!("No se pudo abrir el enlace: {e}"),
                        ToastLevel::Warning,
                    )));
                }
            }
        }
    }
}

fn log_failure(action: &str, error: ApiError) -> String {
    tracing::error!("Error {}: {}", action, error);
    error.to_string()
}

/// Helper functions for creating common commands
impl Command {
    /// Create a batch of commands
    pub fn batch(commands: Vec<Command>) -> Self {
        Command::Batch(commands)
    }

    /// Create an API command
    pub fn api(command: ApiCommand) -> Self {
        Command::Api(command)
    }

    /// Create a filesystem command
    pub fn filesystem(command: FileSystemCommand) -> Self {
        Command::FileSystem(command)
    }

    /// Create a system command
    pub fn system(command: SystemCommand) -> Self {
        Command::System(command)
    }
}
