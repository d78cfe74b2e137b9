//! Event output on stdout.

use std::io::Write;

use clap::ValueEnum;
use crewsense::{EngineEvent, EventSink, Player, Snapshot};
use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// One JSON object per line
    #[default]
    Json,
    /// Colored human-readable summary
    Pretty,
}

pub struct StdoutSink<W: Write> {
    out: W,
    format: Format,
}

impl<W: Write> StdoutSink<W> {
    pub fn new(out: W, format: Format) -> Self {
        Self { out, format }
    }
}

impl<W: Write> EventSink for StdoutSink<W> {
    fn emit(&mut self, event: &EngineEvent) -> crewsense::Result<()> {
        match self.format {
            Format::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)?;
            }
            Format::Pretty => writeln!(self.out, "{}", render(event))?,
        }
        self.out.flush()?;
        Ok(())
    }
}

fn render(event: &EngineEvent) -> String {
    match event {
        EngineEvent::Attached(process) => format!(
            "{} {} (pid {})",
            "attached".green().bold(),
            process.name,
            process.pid
        ),
        EngineEvent::Detached => "detached".red().bold().to_string(),
        EngineEvent::StateChanged(snapshot) => render_snapshot(snapshot),
    }
}

fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut lines = vec![format!(
        "{} {} {}{}",
        snapshot.phase.bold(),
        snapshot.lobby_code.cyan(),
        format!("({} players)", snapshot.players.len()).dimmed(),
        if snapshot.is_host { " [host]" } else { "" }
    )];
    lines.extend(snapshot.players.iter().map(render_player));
    lines.join("\n")
}

fn render_player(player: &Player) -> String {
    let mut flags = Vec::new();
    if player.is_local {
        flags.push("you");
    }
    if player.is_impostor {
        flags.push("impostor");
    }
    if player.is_dead {
        flags.push("dead");
    }
    if player.in_vent {
        flags.push("vent");
    }
    if player.disconnected {
        flags.push("disconnected");
    }

    let name = if player.name.is_empty() {
        "?".to_string()
    } else {
        player.name.clone()
    };
    format!(
        "  {:>2} {:<12} color {:>2} ({:>7.2}, {:>7.2}) {}",
        player.id,
        name,
        player.color_id,
        player.x,
        player.y,
        flags.join(" ").yellow()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewsense::{GamePhase, ProcessInfo};
    use std::io;
    use std::sync::Arc;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lobby() -> EngineEvent {
        EngineEvent::StateChanged(Arc::new(Snapshot {
            phase: GamePhase::Lobby,
            lobby_code: "QWXRTY".to_string(),
            players: vec![Player {
                id: 1,
                name: "Red".to_string(),
                is_local: true,
                ..Player::default()
            }],
            ..Snapshot::default()
        }))
    }

    #[test]
    fn test_json_lines() {
        let mut sink = StdoutSink::new(Vec::new(), Format::Json);
        sink.emit(&EngineEvent::Attached(ProcessInfo {
            pid: 9,
            name: "Among Us.exe".to_string(),
        }))
        .unwrap();
        sink.emit(&lobby()).unwrap();

        let output = String::from_utf8(sink.out).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "attached");
        assert_eq!(lines[1]["event"], "state_changed");
        assert_eq!(lines[1]["lobbyCode"], "QWXRTY");
        assert_eq!(lines[1]["players"][0]["isLocal"], true);
    }

    #[test]
    fn test_pretty_output_mentions_players() {
        let mut sink = StdoutSink::new(Vec::new(), Format::Pretty);
        sink.emit(&lobby()).unwrap();

        let output = String::from_utf8(sink.out).unwrap();
        assert!(output.contains("LOBBY"));
        assert!(output.contains("QWXRTY"));
        assert!(output.contains("Red"));
        assert!(output.contains("you"));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut sink = StdoutSink::new(ClosedPipe, Format::Json);
        assert!(sink.emit(&EngineEvent::Detached).is_err());
    }
}
