//! Line-oriented front end: reads commands, drives the session, prints pages.

use crate::command::{self, Command};
use crate::error::Result;
use crate::notice::{self, NoticeReceiver};
use crate::render;
use crate::session::Session;
use crate::store::RecordStore;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one command to the session. Returns text to print, if any.
pub async fn execute<S: RecordStore>(
    session: &mut Session<S>,
    command: Command,
) -> Result<Option<String>> {
    match command {
        Command::List => {}
        Command::Add(draft) => {
            session.create(draft).await?;
        }
        Command::Edit(id, patch) => {
            session.update(&id, patch).await?;
        }
        Command::Delete(id) => {
            session.delete(&id).await?;
        }
        Command::BulkDelete => {
            session.bulk_delete_selected().await?;
        }
        Command::Undo => {
            session.undo().await?;
        }
        Command::Clone(id) => {
            session.clone_record(&id).await?;
        }
        Command::Toggle(id) => {
            session.toggle(&id)?;
        }
        Command::SelectPage(checked) => session.select_page(checked),
        Command::Search(query) => session.set_search(&query),
        Command::Filter(major) => session.set_filter_major(major.as_deref()),
        Command::Sort(sort) => session.set_sort(sort),
        Command::Page(page) => session.set_page(page),
        Command::Next => session.next_page(),
        Command::Prev => session.prev_page(),
        Command::PageSize(size) => session.set_page_size(size),
        Command::Import(path) => {
            let text = tokio::fs::read_to_string(&path).await?;
            session.import_csv(&text).await?;
        }
        Command::Export(path) => {
            let csv = session.export_csv();
            tokio::fs::write(&path, csv).await?;
            return Ok(Some(format!(
                "Exported {} students to {}",
                session.roster().len(),
                path.display()
            )));
        }
        Command::Majors => return Ok(Some(render::majors(&session.majors()))),
        Command::Chart => return Ok(Some(render::chart(&session.major_counts()))),
        Command::Help => return Ok(Some(render::HELP.to_string())),
        Command::Quit => return Ok(None),
    }
    Ok(None)
}

/// Read commands until end of input or `quit`.
pub async fn run<S, R, W>(
    session: &mut Session<S>,
    notices: &mut NoticeReceiver,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    S: RecordStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    print_block(&mut output, &render::frame(&session.frame())).await?;

    while let Some(line) = lines.next_line().await? {
        let flow = step(session, notices, &line, &mut output).await?;
        if flow == Flow::Quit {
            break;
        }
    }
    output.flush().await
}

async fn step<S, W>(
    session: &mut Session<S>,
    notices: &mut NoticeReceiver,
    line: &str,
    output: &mut W,
) -> std::io::Result<Flow>
where
    S: RecordStore,
    W: AsyncWrite + Unpin,
{
    let command = match command::parse(line) {
        Ok(command) => command,
        Err(e) => {
            print_block(output, &e.to_string()).await?;
            return Ok(Flow::Continue);
        }
    };
    if command == Command::Quit {
        return Ok(Flow::Quit);
    }

    let redraw = command.redraws();
    match execute(session, command).await {
        Ok(Some(text)) => print_block(output, &text).await?,
        Ok(None) => {}
        Err(e) => {
            tracing::debug!(error = %e, "Command failed");
            if !e.is_validation() && !e.is_persistence() && !e.is_not_found() {
                print_block(output, &format!("!! {}", e)).await?;
            }
        }
    }
    if redraw {
        print_block(output, &render::frame(&session.frame())).await?;
    }
    for notice in notice::drain(notices) {
        print_block(output, &notice.to_string()).await?;
    }
    Ok(Flow::Continue)
}

async fn print_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await
}
