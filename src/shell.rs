//! Interactive session over a single [`Workflow`].
//!
//! The shell keeps one workflow alive across commands, so the URL input,
//! the held listing and the error message behave the way a long-lived
//! front end would: `hide` keeps the listing, a failed fetch keeps the old
//! one, and every submit or fetch clears the previous error.
//!
//! ```text
//! archscope> submit https://example.com/stack.yaml
//! archscope> show 1 raw
//! archscope> hide
//! ```

use std::io::Write;

use anyhow::Result;
use archscope_core::backend::Backend;
use archscope_core::format::TimestampFormat;
use archscope_core::render::{render_detail, ContentTab};
use archscope_core::workflow::{Workflow, WorkflowState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::client::open_workflow;
use crate::config::Config;
use crate::list::{cards_for, print_cards, record_by_number};
use crate::present::write_detail;

const PROMPT: &str = "archscope> ";

const HELP: &str = "\
commands:
  submit [url]     scrape url (or the current input), then refresh
  input <url>      set the URL input without submitting
  fetch            refresh the listing
  hide             hide the listing
  list             print the visible cards
  show <n> [raw]   detail view of card n
  status           current state and input
  help             this text
  quit             leave the shell
";

pub async fn run_shell(config: &Config) -> Result<()> {
    let ts_format = config.timestamp_format()?;
    let workflow = open_workflow(config, None, None)?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut shell = Shell::new(workflow, ts_format);
    shell.run(stdin, &mut std::io::stdout()).await
}

pub struct Shell<B> {
    workflow: Workflow<B>,
    ts_format: TimestampFormat,
}

impl<B: Backend> Shell<B> {
    pub fn new(workflow: Workflow<B>, ts_format: TimestampFormat) -> Self {
        Self {
            workflow,
            ts_format,
        }
    }

    pub fn workflow(&self) -> &Workflow<B> {
        &self.workflow
    }

    /// Read commands from `input` until EOF or `quit`.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };
            if !self.execute(line.trim(), out).await? {
                break;
            }
        }
        Ok(())
    }

    /// Run one command line. Returns `false` when the session should end.
    pub async fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<bool> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "quit" | "exit" => return Ok(false),
            "help" => write!(out, "{}", HELP)?,
            "input" => {
                self.workflow.set_input(rest);
                self.write_status(out)?;
            }
            "submit" => {
                if !rest.is_empty() {
                    self.workflow.set_input(rest);
                }
                let url = self.workflow.input().trim().to_string();
                self.workflow.submit_input().await;
                if self.workflow.error().is_none() {
                    writeln!(out, "Scraped {}", url)?;
                    self.write_cards(out)?;
                } else {
                    self.write_status(out)?;
                }
            }
            "fetch" => {
                self.workflow.fetch_all().await;
                if self.workflow.error().is_none() {
                    self.write_cards(out)?;
                } else {
                    self.write_status(out)?;
                }
            }
            "hide" => {
                self.workflow.hide();
                self.write_status(out)?;
            }
            "list" => self.write_cards(out)?,
            "show" => self.show(rest, out)?,
            "status" => self.write_status(out)?,
            other => writeln!(out, "unknown command '{}' (try 'help')", other)?,
        }
        Ok(true)
    }

    fn show<W: Write>(&self, args: &str, out: &mut W) -> Result<()> {
        let mut args = args.split_whitespace();
        let number = match args.next().map(str::parse::<usize>) {
            Some(Ok(n)) => n,
            _ => {
                writeln!(out, "usage: show <n> [raw]")?;
                return Ok(());
            }
        };
        let tab = match args.next() {
            Some("raw") => ContentTab::Raw,
            _ => ContentTab::Parsed,
        };

        match record_by_number(self.workflow.visible_records(), number) {
            Ok(record) => {
                let detail = render_detail(record, &self.ts_format);
                write_detail(out, &detail, tab)?;
                if tab == ContentTab::Raw && !detail.raw.text.ends_with('\n') {
                    writeln!(out)?;
                }
            }
            Err(e) => writeln!(out, "{}", e)?,
        }
        Ok(())
    }

    fn write_cards<W: Write>(&self, out: &mut W) -> Result<()> {
        if !self.workflow.is_visible() {
            writeln!(out, "(listing hidden; 'fetch' to show it)")?;
            return Ok(());
        }
        let cards = cards_for(&self.workflow, &self.ts_format);
        print_cards(out, &cards, false)
    }

    fn write_status<W: Write>(&self, out: &mut W) -> Result<()> {
        let state = match self.workflow.state() {
            WorkflowState::Idle => "idle".to_string(),
            WorkflowState::Submitting => "submitting".to_string(),
            WorkflowState::Fetching => "fetching".to_string(),
            WorkflowState::Visible => {
                format!("showing {} architectures", self.workflow.records().len())
            }
            WorkflowState::Hidden => {
                format!("hidden ({} architectures held)", self.workflow.records().len())
            }
            WorkflowState::Error(message) => format!("error: {}", message),
        };
        writeln!(out, "{}", state)?;
        if !self.workflow.input().is_empty() {
            writeln!(out, "input: {}", self.workflow.input())?;
        }
        Ok(())
    }
}
