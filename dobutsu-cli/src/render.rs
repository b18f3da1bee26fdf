//! Text rendering of engine state
//!
//! Top's pieces are prefixed with `v`, Bottom's with `^`. The selected
//! cell is wrapped in brackets and highlighted targets are marked `+`.

use std::fmt::Write;

use dobutsu_core::{
    Engine, Event, GameStatus, PieceId, Player, Pos, Selection, WinReason, BOARD_HEIGHT, BOARD_WIDTH,
};

/// Render board, reserves, and status as a multi-line string
pub fn render(engine: &Engine) -> String {
    let hints = engine.selection_hints();
    let selected = match engine.selection() {
        Selection::Cell(pos) => Some(pos),
        _ => None,
    };

    let mut out = String::new();
    out.push_str(&render_reserve(engine, Player::Top));
    out.push('\n');

    out.push_str("    ");
    for x in 0..BOARD_WIDTH {
        let _ = write!(out, " {x}  ");
    }
    out.push('\n');

    for y in 0..BOARD_HEIGHT {
        let _ = write!(out, " {y} ");
        for x in 0..BOARD_WIDTH {
            let pos = Pos::new(x, y);
            let label = match engine.piece_at(pos) {
                Some((_, piece)) => format!("{}{}", owner_mark(piece.owner), piece.kind.id()),
                None if hints.contains(&pos) => " +".to_string(),
                None => " .".to_string(),
            };
            if selected == Some(pos) {
                let _ = write!(out, "[{label}]");
            } else if hints.contains(&pos) && engine.piece_at(pos).is_some() {
                let _ = write!(out, "+{label} ");
            } else {
                let _ = write!(out, " {label} ");
            }
        }
        out.push('\n');
    }

    out.push_str(&render_reserve(engine, Player::Bottom));
    out.push('\n');
    out.push_str(&render_status(engine));
    out
}

fn owner_mark(player: Player) -> char {
    match player {
        Player::Top => 'v',
        Player::Bottom => '^',
    }
}

fn render_reserve(engine: &Engine, player: Player) -> String {
    let selected = match engine.selection() {
        Selection::Reserve(id) => Some(id),
        _ => None,
    };

    let entries: Vec<String> = engine
        .reserve(player)
        .iter()
        .enumerate()
        .filter_map(|(i, &id)| {
            let piece = engine.piece(id)?;
            let mark = if selected == Some(id) { "*" } else { "" };
            Some(format!("{i}:{}{mark}", piece.kind.id()))
        })
        .collect();

    format!("{:?} reserve: [{}]", player, entries.join(" "))
}

fn render_status(engine: &Engine) -> String {
    match engine.status() {
        GameStatus::InProgress => format!("{:?} to move", engine.current_player()),
        GameStatus::Finished { winner, reason } => {
            format!("{winner:?} wins ({})", describe_reason(reason))
        }
    }
}

fn describe_reason(reason: WinReason) -> &'static str {
    match reason {
        WinReason::KingCaptured => "lion captured",
        WinReason::Try => "try",
    }
}

/// One-line description of an event
pub fn describe_event(engine: &Engine, event: &Event) -> String {
    let kind_of = |id: PieceId| engine.piece(id).map(|p| p.kind.name()).unwrap_or("?");
    match *event {
        Event::SelectionChanged(Selection::Cell(pos)) => format!("selected {pos}"),
        Event::SelectionChanged(Selection::Reserve(id)) => format!("selected reserve {}", kind_of(id)),
        Event::SelectionChanged(Selection::None) => "selection cleared".to_string(),
        Event::PieceMoved { piece, from, to, captured, promoted } => {
            let mut line = format!("{} {from} -> {to}", kind_of(piece));
            if let Some(captured) = captured {
                let _ = write!(line, ", captured {}", kind_of(captured));
            }
            if promoted {
                line.push_str(", promoted");
            }
            line
        }
        Event::PieceDropped { piece, to } => format!("{} dropped at {to}", kind_of(piece)),
        Event::TurnChanged(player) => format!("{player:?} to move"),
        Event::GameFinished { winner, reason } => {
            format!("{winner:?} wins ({})", describe_reason(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_standard_board() {
        let engine = Engine::standard();
        let text = render(&engine);
        assert!(text.contains(" vG  vL  vE "));
        assert!(text.contains(" ^E  ^L  ^G "));
        assert!(text.ends_with("Bottom to move"));
    }

    #[test]
    fn test_render_selection_and_hints() {
        let mut engine = Engine::standard();
        engine.on_cell_activated(Pos::new(1, 2));
        let text = render(&engine);
        assert!(text.contains("[^C]"));
        // The chick's only target holds Top's chick
        assert!(text.contains("+vC "));
    }

    #[test]
    fn test_describe_capture() {
        let mut engine = Engine::standard();
        engine.on_cell_activated(Pos::new(1, 2));
        let events = engine.on_cell_activated(Pos::new(1, 1));
        let line = describe_event(&engine, &events[0]);
        assert_eq!(line, "Chick (1, 2) -> (1, 1), captured Chick");
    }
}
