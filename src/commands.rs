//! CLI command handlers.
//!
//! List commands fetch one resource, filter it and print a table. Mutation
//! commands validate locally, send one request and print the response.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use playdeck_client::{ClientConfig, HttpTransport, WsConnector};
use playdeck_core::{
    CONNECTION_CLOSED_MARKER, CommandRequest, Configuration, Environment, ExecutionLog,
    FilteredList, LiveStreamView, LogField, LogRow, Mutation, MutationDispatcher, NameResolver,
    NewConfiguration, NewSchedule, NewServer, NewTemplate, PlaybookUpload, Resource,
    ResourceDescriptor, ResourceFetcher, Schedule, ScheduleField, ScheduleStatus, Searchable,
    Selection, Server, ServerField, StreamCommand, StreamEvent, StreamState, TableModel, TableRow,
    Template, TerminalTarget, Transport, filter_by,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::cli::{Commands, ScheduleArgs, ServerArgs, TerminalArgs};
use crate::output::write_table;

/// Execute a CLI command, printing results to `out`.
///
/// # Errors
///
/// Returns an error if the backend is unreachable, rejects the request, or
/// the input fails validation.
pub async fn execute_command(
    command: Commands,
    config: &ClientConfig,
    out: &mut impl Write,
) -> Result<()> {
    let transport: Rc<dyn Transport> =
        Rc::new(HttpTransport::new(config).context("Failed to build HTTP client")?);

    match command {
        Commands::Servers {
            env,
            status,
            search,
            watch,
        } => {
            let interval = watch_interval(watch, config.poll_interval);
            cmd_servers(transport, env, status, search, interval, out).await
        }
        Commands::Templates { search } => cmd_templates(transport, search, out).await,
        Commands::Logs { status, search } => cmd_logs(transport, status, search, out).await,
        Commands::Schedules { status } => cmd_schedules(transport, status, out).await,
        Commands::Configs => cmd_configs(transport, out).await,
        Commands::Terminal(args) => {
            let stdin = stdin_commands(LinesStream::new(
                BufReader::new(tokio::io::stdin()).lines(),
            ));
            run_terminal(args, config, stdin, out).await
        }
        Commands::Upload {
            name,
            description,
            file,
        } => cmd_upload(transport, name, description, &file, out).await,
        Commands::Exec { servers, command } => {
            let request = CommandRequest {
                server_ids: servers,
                command: command.join(" "),
            };
            mutate(transport, &Mutation::ExecuteCommand(request), out).await
        }
        Commands::ScheduleCreate(args) => cmd_schedule_create(transport, args, out).await,
        Commands::TemplateCreate {
            name,
            description,
            configs,
        } => cmd_template_create(transport, name, description, &configs, out).await,
        Commands::TemplateDelete { id } => {
            mutate(transport, &Mutation::DeleteTemplate(id), out).await
        }
        Commands::ConfigCreate {
            name,
            module,
            configuration,
            description,
        } => {
            let new_config = NewConfiguration {
                name,
                description,
                module,
                configuration,
            };
            mutate(transport, &Mutation::CreateConfiguration(new_config), out).await
        }
        Commands::ConfigDelete { id } => {
            mutate(transport, &Mutation::DeleteConfiguration(id), out).await
        }
        Commands::ServerCreate(args) => {
            mutate(transport, &Mutation::CreateServer(new_server(args)), out).await
        }
    }
}

// ============================================================================
// LIST COMMANDS
// ============================================================================

async fn cmd_servers(
    transport: Rc<dyn Transport>,
    env: Option<String>,
    status: Option<String>,
    search: Option<String>,
    interval: Option<Duration>,
    out: &mut impl Write,
) -> Result<()> {
    let by_env = FilteredList::new(ServerField::Environment)
        .with_selection(selection(env.as_deref()))
        .with_search(search.unwrap_or_default());
    let by_status = selection(status.as_deref());
    let select = |items: &[Server]| -> Vec<Server> {
        by_env
            .apply(items)
            .into_iter()
            .filter(|server| by_status.matches(server.status.as_str()))
            .cloned()
            .collect()
    };

    let servers = ResourceFetcher::<Server>::new(transport, ResourceDescriptor::SERVERS);

    let Some(interval) = interval else {
        servers.refresh().await;
        let state = servers.state();
        return print_resource(out, &narrow(&state, select), ResourceDescriptor::SERVERS.label);
    };

    info!(interval_secs = interval.as_secs(), "Watching servers");
    let sleep = |interval| {
        let state = servers.state();
        let model = table(&narrow(&state, select), ResourceDescriptor::SERVERS.label);
        if let Err(e) = write_table(&mut *out, &model).and_then(|()| writeln!(out)) {
            warn!(error = %e, "Failed to print server table");
        }
        tokio::time::sleep(interval)
    };

    tokio::select! {
        () = servers.poll(interval, sleep) => {}
        _ = tokio::signal::ctrl_c() => info!("Stopped watching servers"),
    }
    servers.teardown();
    Ok(())
}

async fn cmd_templates(
    transport: Rc<dyn Transport>,
    search: Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    let needle = search.unwrap_or_default();
    let templates = ResourceFetcher::<Template>::new(transport, ResourceDescriptor::TEMPLATES);
    templates.refresh().await;

    let state = templates.state();
    let matching = narrow(&state, |items| {
        items
            .iter()
            .filter(|template| template.matches_search(&needle))
            .cloned()
            .collect()
    });
    print_resource(out, &matching, ResourceDescriptor::TEMPLATES.label)
}

async fn cmd_logs(
    transport: Rc<dyn Transport>,
    status: Option<String>,
    search: Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    let logs = ResourceFetcher::<ExecutionLog>::new(transport.clone(), ResourceDescriptor::LOGS);
    logs.refresh().await;

    let rows = match logs.state() {
        Resource::Loaded(items) => {
            let resolver = NameResolver::new(transport);
            resolver.resolve_logs(&items).await;
            Resource::Loaded(LogRow::join(&items, |id| resolver.name_of(id)))
        }
        Resource::Failed(e) => Resource::Failed(e),
        Resource::Loading => Resource::Loading,
    };

    let list = FilteredList::new(LogField::Status)
        .with_selection(selection(status.as_deref()))
        .with_search(search.unwrap_or_default());
    let matching = narrow(&rows, |items| list.apply(items).into_iter().cloned().collect());
    print_resource(out, &matching, ResourceDescriptor::LOGS.label)
}

async fn cmd_schedules(
    transport: Rc<dyn Transport>,
    status: Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    let schedules = ResourceFetcher::<Schedule>::new(transport, ResourceDescriptor::SCHEDULES);
    schedules.refresh().await;

    let wanted = selection(status.as_deref());
    let state = schedules.state();
    let matching = narrow(&state, |items| {
        filter_by(items, ScheduleField::Status, &wanted)
            .into_iter()
            .cloned()
            .collect()
    });
    print_resource(out, &matching, ResourceDescriptor::SCHEDULES.label)
}

async fn cmd_configs(transport: Rc<dyn Transport>, out: &mut impl Write) -> Result<()> {
    let configs =
        ResourceFetcher::<Configuration>::new(transport, ResourceDescriptor::CONFIGURATIONS);
    configs.refresh().await;
    let state = configs.state();
    print_resource(out, &state, ResourceDescriptor::CONFIGURATIONS.label)
}

/// `--watch 0` turns polling off, even when the config sets an interval.
fn watch_interval(watch: Option<u64>, configured: Option<Duration>) -> Option<Duration> {
    match watch {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => configured,
    }
}

/// Terminal input lines. A read error ends the stream, which closes the view.
fn stdin_commands(
    lines: impl Stream<Item = std::io::Result<String>> + Unpin,
) -> impl Stream<Item = StreamCommand> + Unpin {
    lines.map_while(|line| match line {
        Ok(line) => Some(StreamCommand::Input(line)),
        Err(e) => {
            warn!(error = %e, "Failed to read stdin, closing terminal");
            None
        }
    })
}

fn selection(raw: Option<&str>) -> Selection {
    raw.map_or(Selection::All, Selection::parse)
}

/// Apply `select` to loaded items, keeping loading and failure as they are.
fn narrow<T: Clone>(state: &Resource<T>, select: impl FnOnce(&[T]) -> Vec<T>) -> Resource<T> {
    match state {
        Resource::Loaded(items) => Resource::Loaded(select(items)),
        Resource::Failed(e) => Resource::Failed(e.clone()),
        Resource::Loading => Resource::Loading,
    }
}

fn table<T: TableRow>(state: &Resource<T>, label: &str) -> TableModel {
    TableModel::from_resource(state, label, |items| items.iter().collect())
}

fn print_resource<T: TableRow>(out: &mut impl Write, state: &Resource<T>, label: &str) -> Result<()> {
    if let Some(error) = state.error() {
        return Err(anyhow::Error::new(error.clone()).context(format!("Failed to load {label}")));
    }
    write_table(out, &table(state, label))?;
    Ok(())
}

// ============================================================================
// MUTATION COMMANDS
// ============================================================================

async fn mutate(
    transport: Rc<dyn Transport>,
    mutation: &Mutation,
    out: &mut impl Write,
) -> Result<()> {
    let response = MutationDispatcher::new(transport)
        .dispatch(mutation)
        .await
        .with_context(|| format!("Failed to {}", mutation.label()))?;

    writeln!(out, "Done: {}", mutation.label())?;
    if !response.is_null() {
        writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
    }
    Ok(())
}

async fn cmd_upload(
    transport: Rc<dyn Transport>,
    name: String,
    description: String,
    file: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read playbook {}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToString::to_string)
        .ok_or_else(|| anyhow!("Playbook path has no file name: {}", file.display()))?;

    let upload = PlaybookUpload {
        name,
        description,
        file_name,
        content,
    };
    mutate(transport, &Mutation::UploadPlaybook(upload), out).await
}

async fn cmd_schedule_create(
    transport: Rc<dyn Transport>,
    args: ScheduleArgs,
    out: &mut impl Write,
) -> Result<()> {
    let schedule = NewSchedule {
        name: args.name,
        playbook: args.playbook,
        target: args.target,
        frequency: args.frequency,
        time: args.time,
        day_of_week: args.day_of_week,
        day_of_month: args.day_of_month,
        status: if args.paused {
            ScheduleStatus::Paused
        } else {
            ScheduleStatus::Active
        },
        ..NewSchedule::default()
    };
    writeln!(out, "{}", schedule.describe())?;
    if let Some(next) = schedule.next_run_after(chrono::Local::now().naive_local()) {
        writeln!(out, "Next run: {}", next.format("%Y-%m-%d %H:%M"))?;
    }
    mutate(transport, &Mutation::CreateSchedule(schedule), out).await
}

fn new_server(args: ServerArgs) -> NewServer {
    NewServer {
        name: args.name,
        ip_address: args.ip_address,
        username: args.username,
        password: args.password.into(),
        ssh_port: args.ssh_port,
        environment: Environment::from(args.environment.as_str()),
        os: args.os,
        project: args.project,
        status: false,
    }
}

async fn cmd_template_create(
    transport: Rc<dyn Transport>,
    name: String,
    description: String,
    ids: &[i64],
    out: &mut impl Write,
) -> Result<()> {
    let configs = ResourceFetcher::<Configuration>::new(
        transport.clone(),
        ResourceDescriptor::CONFIGURATIONS,
    );
    configs.refresh().await;

    let state = configs.state();
    if let Some(error) = state.error() {
        return Err(anyhow::Error::new(error.clone()).context("Failed to load configurations"));
    }
    let steps = ids
        .iter()
        .map(|id| {
            state
                .items()
                .iter()
                .find(|config| config.id == *id)
                .cloned()
                .ok_or_else(|| anyhow!("No configuration with id {id}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let template = NewTemplate::from_configurations(name, description, steps);
    mutate(transport, &Mutation::CreateTemplate(template), out).await
}

// ============================================================================
// TERMINAL
// ============================================================================

/// Attach a terminal to `args.server_ip`, sending each item of `commands`
/// as a line and printing output as it arrives. Ends when the server
/// closes, `commands` runs out, or Ctrl+C is pressed.
///
/// # Errors
///
/// Returns an error if the socket cannot be opened or authenticated.
pub async fn run_terminal<C>(
    args: TerminalArgs,
    config: &ClientConfig,
    commands: C,
    out: &mut impl Write,
) -> Result<()>
where
    C: Stream<Item = StreamCommand> + Unpin,
{
    let ws_base = config.ws_base().context("Invalid terminal URL")?;
    let connector = WsConnector::from_config(config);
    let target = TerminalTarget::new(args.server_ip, args.username, args.password);

    let mut view = LiveStreamView::new();
    if view.connect(&connector, &target, ws_base.as_str()).await != StreamState::Open {
        let reason = view
            .last_error()
            .map_or_else(|| "connection closed".to_string(), ToString::to_string);
        bail!("Terminal on {} failed: {reason}", target.server_ip);
    }
    writeln!(out, "Connected to {}. Ctrl+D closes the session.", target.server_ip)?;
    out.flush()?;

    let handle = view.teardown_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.request();
        }
    });

    view.run(commands, |event| {
        let written = match event {
            StreamEvent::Output(text) => write!(out, "{text}"),
            StreamEvent::Closed => write!(out, "{CONNECTION_CLOSED_MARKER}"),
            StreamEvent::Rejected(outcome) => {
                warn!(?outcome, "Command not sent");
                Ok(())
            }
            StreamEvent::Opened | StreamEvent::Sent(_) => Ok(()),
        };
        if let Err(e) = written.and_then(|()| out.flush()) {
            warn!(error = %e, "Failed to print terminal output");
        }
    })
    .await;

    interrupt.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use playdeck_core::ServerStatus;

    #[test]
    fn test_missing_tab_selects_all() {
        assert_eq!(selection(None), Selection::All);
        assert_eq!(selection(Some("All")), Selection::All);
        assert_eq!(selection(Some("staging")), Selection::only("staging"));
    }

    #[test]
    fn test_watch_zero_disables_polling() {
        let configured = Some(Duration::from_secs(30));
        assert_eq!(watch_interval(Some(0), configured), None);
        assert_eq!(watch_interval(Some(5), configured), Some(Duration::from_secs(5)));
        assert_eq!(watch_interval(None, configured), configured);
        assert_eq!(watch_interval(None, None), None);
    }

    #[tokio::test]
    async fn test_stdin_read_error_ends_commands() {
        let lines = tokio_stream::iter(vec![
            Ok("uptime".to_string()),
            Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "invalid utf-8")),
            Ok("whoami".to_string()),
        ]);

        let commands: Vec<StreamCommand> = stdin_commands(lines).collect().await;

        assert_eq!(commands, vec![StreamCommand::Input("uptime".to_string())]);
    }

    #[test]
    fn test_narrow_keeps_failure() {
        let failed: Resource<Server> =
            Resource::Failed(playdeck_core::Error::network_failure("refused"));
        let narrowed = narrow(&failed, |_| Vec::new());
        assert!(narrowed.error().is_some());
    }

    #[test]
    fn test_print_resource_reports_failure_and_prints_nothing() {
        let failed: Resource<Server> = Resource::Failed(playdeck_core::Error::status("/x", 500));
        let mut out = Vec::new();

        let result = print_resource(&mut out, &failed, "servers");

        assert!(result.is_err_and(|e| e.to_string() == "Failed to load servers"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_print_resource_renders_rows() {
        let loaded = Resource::Loaded(vec![
            Server::new(1, "web-01", "10.0.0.1").with_status(ServerStatus::Online),
        ]);
        let mut out = Vec::new();

        print_resource(&mut out, &loaded, "servers").unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Name"));
        assert!(text.contains("web-01"));
    }
}
