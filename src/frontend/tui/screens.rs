//! Screen rendering for the TUI: auth gate, browse list, game details.
//!
//! Everything here reads `AppCore` and draws; nothing mutates state.

use crate::catalog::{GameRecord, ListKind};
use crate::core::AppCore;
use crate::data::ui_state::{AuthFormKind, Screen};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const ACCENT: Color = Color::Yellow;
const MUTED: Color = Color::DarkGray;

pub fn draw(f: &mut Frame, core: &AppCore) {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(f.area());

    draw_header(f, header, core);

    match core.ui_state.screen {
        Screen::Login | Screen::Register => draw_auth_form(f, body, core),
        Screen::Browse => draw_browse(f, body, core),
        Screen::Detail(_) => draw_detail(f, body, core),
    }

    draw_status(f, status, core);
}

fn draw_header(f: &mut Frame, area: Rect, core: &AppCore) {
    let mut spans = vec![Span::styled(
        " courtside ",
        Style::default().fg(Color::Black).bg(ACCENT),
    )];

    if !core.ui_state.screen.is_auth_gate() {
        for kind in [ListKind::Games, ListKind::Tournaments] {
            let style = if kind == core.ui_state.browse.list {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(MUTED)
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(kind.label(), style));
        }
    }

    if let Some(user) = core.current_user() {
        spans.push(Span::raw("   "));
        let name = if user.is_guest() {
            format!("@{} (guest)", user.username)
        } else {
            format!("@{}", user.username)
        };
        spans.push(Span::styled(name, Style::default().fg(Color::Cyan)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status(f: &mut Frame, area: Rect, core: &AppCore) {
    let hints = match core.ui_state.screen {
        Screen::Login | Screen::Register => {
            "Enter submit | Tab next field | Ctrl+G guest | Ctrl+R login/register | Esc quit"
        }
        Screen::Browse => "Type to search | Tab games/tournaments | Enter details | Ctrl+O sign out | Esc clear/quit",
        Screen::Detail(_) => "Esc back | Ctrl+O sign out",
    };

    let mut spans = Vec::new();
    if !core.ui_state.status_text.is_empty() {
        spans.push(Span::styled(
            format!("{}  ", core.ui_state.status_text),
            Style::default().fg(Color::Green),
        ));
    }
    if !core.ui_state.screen.is_auth_gate() {
        spans.push(Span::styled(
            format!("[{}]  ", core.location.describe()),
            Style::default().fg(Color::Cyan),
        ));
    }
    spans.push(Span::styled(hints, Style::default().fg(MUTED)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);
    cell
}

fn draw_auth_form(f: &mut Frame, area: Rect, core: &AppCore) {
    let form = &core.ui_state.form;
    let title = match form.kind {
        AuthFormKind::Login => " Sign in ",
        AuthFormKind::Register => " Create account ",
    };

    // Three rows per field, plus the error line and borders
    let height = form.fields.len() as u16 * 3 + 4;
    let outer = centered(area, 52.min(area.width), height.min(area.height));
    let block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(outer);
    f.render_widget(block, outer);

    let mut constraints: Vec<Constraint> = form.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(1));
    let rows = Layout::vertical(constraints).split(inner);

    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focused;
        let border = if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(MUTED)
        };
        let mut value = field.display_value();
        if focused {
            value.push('▏');
        }
        let input = Paragraph::new(value).block(
            Block::bordered()
                .title(format!(" {} ", field.label))
                .border_style(border),
        );
        f.render_widget(input, rows[idx]);
    }

    if let Some(error) = core.auth_error() {
        let line = Line::from(Span::styled(
            error.message().to_string(),
            Style::default().fg(Color::Red),
        ));
        f.render_widget(Paragraph::new(line), rows[form.fields.len()]);
    }
}

fn draw_browse(f: &mut Frame, area: Rect, core: &AppCore) {
    let [search_area, list_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let browse = &core.ui_state.browse;
    let search = Paragraph::new(format!("{}▏", browse.search_text)).block(
        Block::bordered()
            .title(" Search teams, venues, leagues ")
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(search, search_area);

    let games = core.visible_games();
    let title = format!(" {} ({}) ", browse.list.label(), games.len());

    if games.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No matches",
            Style::default().fg(MUTED),
        )))
        .block(Block::bordered().title(title));
        f.render_widget(empty, list_area);
        return;
    }

    let items: Vec<ListItem> = games.iter().map(|game| game_list_item(core, game)).collect();
    let list = List::new(items)
        .block(Block::bordered().title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(browse.selected));
    f.render_stateful_widget(list, list_area, &mut state);
}

fn game_list_item<'a>(core: &AppCore, game: &'a GameRecord) -> ListItem<'a> {
    let mut first = vec![
        Span::styled(
            format!("{:<16}", game.date.format("%a %b %e").to_string()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(game.matchup(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(km) = core.distance_km(game) {
        first.push(Span::styled(
            format!("  {:.1} km", km),
            Style::default().fg(Color::Green),
        ));
    }

    let second = Line::from(vec![
        Span::raw(" ".repeat(16)),
        Span::styled(
            format!("{} | {} | {}", game.time, game.venue, game.league),
            Style::default().fg(MUTED),
        ),
    ]);

    ListItem::new(vec![Line::from(first), second])
}

fn draw_detail(f: &mut Frame, area: Rect, core: &AppCore) {
    let Some(game) = core.detail_game() else {
        f.render_widget(Paragraph::new("Game no longer available"), area);
        return;
    };

    let label = |text: &'static str| Span::styled(format!("{:<10}", text), Style::default().fg(MUTED));

    let mut lines = vec![
        Line::from(Span::styled(
            game.matchup(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![label("When"), Span::raw(format!("{} ({})", game.date.format("%A, %B %e %Y"), game.time))]),
        Line::from(vec![label("League"), Span::raw(game.league.clone())]),
        Line::from(vec![label("Venue"), Span::raw(game.venue.clone())]),
        Line::from(vec![label("Address"), Span::raw(game.address.clone())]),
        Line::from(vec![
            label("Map"),
            Span::raw(format!(
                "{:.4}, {:.4}",
                game.coordinate.latitude, game.coordinate.longitude
            )),
        ]),
    ];

    if let Some(km) = core.distance_km(game) {
        lines.push(Line::from(vec![label("Distance"), Span::raw(format!("{:.1} km away", km))]));
    }
    if let Some(price) = &game.ticket_price {
        lines.push(Line::from(vec![label("Tickets"), Span::raw(price.clone())]));
    }
    if !game.description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(game.description.clone()));
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::bordered().title(" Game details "));
    f.render_widget(detail, area);
}
