// ABOUTME: Headless shell entry point.
// ABOUTME: Loads config, sets up logging, and replays a layout script against the pane tree.

mod cli;
mod script;

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::rc::Rc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use pane_core::Config;
use pane_layout::ancestry::{find_enclosing, MAX_OWNER_DEPTH};
use pane_layout::{
    ContentId, NodeId, Orientation, PaneCommand, PaneEvent, PaneTree, RecordingHost, Size,
};
use script::Command;
use tracing::Level;

use crate::cli::Cli;

const DEFAULT_SIZE: Size = Size::new(1200, 800);

/// Pane names as written in the script
#[derive(Default)]
struct Names {
    by_name: HashMap<String, ContentId>,
    by_id: HashMap<ContentId, String>,
}

impl Names {
    fn label(&self, id: Option<ContentId>) -> String {
        match id {
            Some(id) => self.by_id.get(&id).cloned().unwrap_or_else(|| id.to_string()),
            None => "-".to_string(),
        }
    }
}

struct Shell {
    tree: PaneTree<RecordingHost>,
    names: Rc<RefCell<Names>>,
}

impl Shell {
    fn new(config: &Config) -> Self {
        let mut tree = PaneTree::new(RecordingHost::new(DEFAULT_SIZE), config.layout.clone());
        let names = Rc::new(RefCell::new(Names::default()));

        let labels = names.clone();
        tree.subscribe(move |_, event| {
            let names = labels.borrow();
            match event {
                PaneEvent::PaneAdded(id) => println!("+ {}", names.label(Some(*id))),
                PaneEvent::PaneRemoved(id) => println!("- {}", names.label(Some(*id))),
                PaneEvent::AllPanesRemoved => println!("(empty)"),
                PaneEvent::SplitterPositionChanged {
                    first,
                    second,
                    orientation,
                    position,
                } => println!(
                    "~ {} | {} {} divider at {}",
                    names.label(*first),
                    names.label(*second),
                    orientation.label(),
                    position
                ),
                PaneEvent::SplitterOrientationChanged {
                    first,
                    second,
                    orientation,
                } => println!(
                    "~ {} | {} now {}",
                    names.label(*first),
                    names.label(*second),
                    orientation.label()
                ),
            }
        });

        Self { tree, names }
    }

    fn lookup(&self, name: &str) -> Result<ContentId> {
        match self.names.borrow().by_name.get(name) {
            Some(id) => Ok(*id),
            None => bail!("no pane named {name:?}"),
        }
    }

    /// Nearest split above `name`, restricted to one axis if asked
    fn enclosing_split(&self, name: &str, axis: Option<Orientation>) -> Result<NodeId> {
        let content = self.lookup(name)?;
        let leaf = self
            .tree
            .leaf_of(content)
            .with_context(|| format!("{name} is not in the layout"))?;
        let tree = &self.tree;
        let found = find_enclosing(
            leaf,
            |id| tree.node(id).and_then(|record| record.parent),
            |id| match tree.split(id) {
                Some(split) => axis.map_or(true, |axis| split.orientation == axis),
                None => false,
            },
            MAX_OWNER_DEPTH,
        );
        found.with_context(|| format!("{name} has no enclosing divider"))
    }

    fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Size { width, height } => {
                self.tree.host_mut().set_root_size(Size::new(width, height));
                self.tree.relayout()?;
            }
            Command::Add {
                name,
                near,
                prev,
                curr,
            } => {
                if self.names.borrow().by_name.contains_key(&name) {
                    bail!("pane {name:?} already exists");
                }
                let id = self.tree.issue_content_id();
                {
                    let mut names = self.names.borrow_mut();
                    names.by_name.insert(name.clone(), id);
                    names.by_id.insert(id, name);
                }
                match near {
                    Some((position, target)) => {
                        // Unknown neighbours fall back inside the tree
                        let anchor = self.names.borrow().by_name.get(&target).copied();
                        self.tree.add_near(id, anchor, position, prev, curr)?;
                    }
                    None => self.tree.add_first(id)?,
                }
            }
            Command::Remove(name) => {
                let id = self.lookup(&name)?;
                self.tree.remove(id)?;
            }
            Command::Drag {
                name,
                position,
                orientation,
            } => {
                let split = self.enclosing_split(&name, orientation)?;
                self.tree.notify_divider_moved(split, position)?;
            }
            Command::Flip(name) => {
                let split = self.enclosing_split(&name, None)?;
                self.tree.execute(PaneCommand::FlipOrientation(split))?;
            }
            Command::Close { name, side } => {
                let split = self.enclosing_split(&name, None)?;
                self.tree.execute(PaneCommand::CloseSide { split, side })?;
            }
            Command::Show => match self.tree.shape() {
                Some(shape) => {
                    let names = self.names.borrow();
                    print!("{}", shape.render(&|id| names.label(Some(id))));
                }
                None => println!("(empty)"),
            },
            Command::Dump => {
                let shape = self.tree.shape();
                println!("{}", serde_json::to_string_pretty(&shape)?);
            }
            Command::Panes => {
                let names = self.names.borrow();
                let listed: Vec<String> = self.tree.panes().map(|id| names.label(Some(id))).collect();
                println!("{}", listed.join(" "));
            }
        }

        self.forget_closed();
        for call in self.tree.host_mut().take_calls() {
            tracing::debug!("host: {:?}", call);
        }
        Ok(())
    }

    /// Drop names of panes the tree no longer holds
    fn forget_closed(&mut self) {
        let tree = &self.tree;
        let mut names = self.names.borrow_mut();
        names.by_id.retain(|id, _| tree.contains(*id));
        let Names { by_name, by_id } = &mut *names;
        by_name.retain(|_, id| by_id.contains_key(id));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_or_default(),
    };

    let level = match cli.log {
        Some(level) => Level::from(level),
        None => config
            .logging
            .level
            .parse()
            .map_err(|_| anyhow!("unknown log level {:?} in config", config.logging.level))?,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if cli.write_config {
        let path = config.save_to_default()?;
        tracing::info!("Wrote config to {}", path.display());
        return Ok(());
    }

    tracing::info!(
        "Starting pane-shell: min pane size {}, policy {:?}",
        config.layout.min_pane_size,
        config.layout.size_policy
    );

    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut shell = Shell::new(&config);
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let command = match script::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                tracing::error!("line {}: {:#}", number + 1, e);
                continue;
            }
        };
        if let Err(e) = shell.run(command) {
            tracing::error!("line {}: {:#}", number + 1, e);
        }
    }

    tracing::info!("Script finished with {} panes", shell.tree.len());
    Ok(())
}
