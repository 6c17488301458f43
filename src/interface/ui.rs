use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, BorderType, Paragraph, Tabs,
        Sparkline, Table, Row, Cell, Wrap, ListItem, List,
        canvas::{Canvas, Circle, Line as CanvasLine},
    },
    style::{Color, Style, Modifier},
    text::{Line, Span},
};

use crate::core::domain::AtomKind;
use crate::interface::state::{AppMode, AppState};
use crate::interface::store::EditorField;

// --- Color Palette ---
const COL_BG: Color = Color::Reset;
const COL_FG: Color = Color::White;
const COL_HIGHLIGHT: Color = Color::Yellow;
const COL_ACCENT: Color = Color::Cyan;
const COL_BOND: Color = Color::Gray;
const COL_SUCCESS: Color = Color::Green;
const COL_FAIL: Color = Color::Red;
const COL_HEADER: Color = Color::Magenta;

fn kind_color(kind: AtomKind) -> Color {
    let (r, g, b) = kind.color_rgb();
    Color::Rgb(r, g, b)
}

pub fn draw(f: &mut Frame, app: &mut AppState) {
    if f.area().width < 40 || f.area().height < 10 {
        let p = Paragraph::new("Terminal too small.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, f.area());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    match app.mode {
        AppMode::Simulation => draw_simulation(f, app, chunks[1]),
        AppMode::Rules => draw_rules(f, app, chunks[1]),
        AppMode::Help => draw_help(f, chunks[1]),
    }

    draw_footer(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &AppState, area: Rect) {
    let titles = vec![" 1:Simulation ", " 2:Rules ", " 3:Help "];
    let idx = match app.mode {
        AppMode::Simulation => 0,
        AppMode::Rules => 1,
        AppMode::Help => 2,
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(idx)
        .highlight_style(Style::default().fg(COL_HIGHLIGHT).add_modifier(Modifier::BOLD));

    f.render_widget(tabs, area);
}

fn draw_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_str, color) = if app.paused { ("PAUSED", COL_HIGHLIGHT) } else { ("RUNNING", COL_SUCCESS) };

    let text = Line::from(vec![
        Span::styled(format!(" {:<8}", status_str), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(" | "),
        Span::raw(format!("Step {:<7}", app.world.steps())),
        Span::raw(" | "),
        Span::raw(format!("{:<5.0} steps/s", app.steps_per_second)),
        Span::raw(" | "),
        Span::styled(format!("Rules: {}", app.store.rules().len()), Style::default().fg(COL_ACCENT)),
        Span::raw(" | [Q]uit [Space]Pause [N]ext [R]eset [Enter]Submit"),
    ]);

    let p = Paragraph::new(text)
        .style(Style::default().bg(Color::DarkGray).fg(COL_FG));
    f.render_widget(p, area);
}

fn draw_simulation(f: &mut Frame, app: &AppState, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_world(f, app, cols[0]);

    let right_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Percentage(30), Constraint::Min(0)])
        .split(cols[1]);

    draw_current_rule(f, app, right_rows[0]);
    draw_stats(f, app, right_rows[1]);
    draw_logs(f, app, right_rows[2]);
}

fn draw_world(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .title(" Reaction Chamber ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    let inner_area = block.inner(area);
    f.render_widget(block, area);
    if inner_area.width < 1 || inner_area.height < 1 { return; }

    let world = &app.world;
    let (w, h) = (world.width, world.height);
    // Canvas y grows upwards; world y grows downwards.
    let flip = |y: f64| h - y;

    let canvas = Canvas::default()
        .background_color(COL_BG)
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(|ctx| {
            for bond in world.bonds() {
                let (Some(a), Some(b)) = (world.body(bond.body_a), world.body(bond.body_b)) else { continue };
                ctx.draw(&CanvasLine {
                    x1: a.position.x, y1: flip(a.position.y),
                    x2: b.position.x, y2: flip(b.position.y),
                    color: COL_BOND,
                });
            }
            ctx.layer();
            for body in world.bodies() {
                ctx.draw(&Circle {
                    x: body.position.x,
                    y: flip(body.position.y),
                    radius: body.radius,
                    color: kind_color(body.atom.kind),
                });
            }
            ctx.layer();
            for body in world.bodies() {
                ctx.print(
                    body.position.x,
                    flip(body.position.y),
                    Span::styled(body.atom.signature().to_string(), Style::default().fg(kind_color(body.atom.kind))),
                );
            }
        });

    f.render_widget(canvas, inner_area);
}

fn draw_current_rule(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title(" Draft Rule ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = vec![
        Line::from(Span::styled(app.store.current().to_string(), Style::default().fg(COL_HIGHLIGHT).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled("Edit on tab 2, [Enter] to submit", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Paragraph::new(text), inner);
}

fn draw_stats(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title(" Statistics ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(inner);

    let s = &app.stats;
    let kv = |k: &str, v: String, col: Color| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:<14}", k), Style::default().fg(Color::Gray)),
            Span::styled(v, Style::default().fg(col)),
        ])
    };

    let text = vec![
        kv("Reactions:", s.reactions.to_string(), COL_HIGHLIGHT),
        kv("Bonds:", format!("{} (+{} / -{})", app.census.bonds, s.bonds_formed, s.bonds_broken), COL_HIGHLIGHT),
        kv("Molecules:", format!("{} (max {})", app.census.molecules, app.census.largest_molecule), COL_HIGHLIGHT),
        kv("Contacts:", format!("{} ({} tracked)", app.world.contact_count(), app.ledger.len()), COL_ACCENT),
        kv("Corrections:", s.corrections.to_string(), COL_ACCENT),
        kv("Drift warns:", s.drift_warnings.to_string(), if s.drift_warnings > 0 { COL_FAIL } else { COL_SUCCESS }),
    ];
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), rows[0]);

    let width = rows[1].width as usize;
    let data: Vec<u64> = app.telemetry.reaction_history.iter()
        .rev()
        .take(width)
        .copied()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let spark = Sparkline::default()
        .style(Style::default().fg(COL_SUCCESS))
        .data(&data);
    f.render_widget(spark, rows[1]);
}

fn draw_logs(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title(" Event Log ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let items: Vec<ListItem> = app.logs.iter().rev().map(|line| {
        let style = if line.contains("WARN") || line.contains("ERROR") || line.contains("failed") {
            Style::default().fg(COL_FAIL)
        } else if line.contains(">>>") {
            Style::default().fg(COL_SUCCESS)
        } else {
            Style::default().fg(Color::Gray)
        };

        ListItem::new(Line::from(vec![
            Span::styled(">", Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::raw(line.as_str()),
        ])).style(style)
    }).collect();

    f.render_widget(List::new(items), inner);
}

fn draw_rules(f: &mut Frame, app: &mut AppState, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_editor(f, app, cols[0]);

    let right_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(cols[1]);

    draw_rule_table(f, app, right_rows[0]);
    draw_census(f, app, right_rows[1]);
}

fn draw_editor(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .title(" Rule Editor ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rule = app.store.current();
    let mut items: Vec<ListItem> = Vec::with_capacity(EditorField::ALL.len() + 3);
    for field in EditorField::ALL {
        let focused = field == app.editor_field;
        let marker = if focused { "▶ " } else { "  " };
        let value_style = if focused {
            Style::default().fg(COL_HIGHLIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COL_FG)
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(marker, Style::default().fg(COL_HIGHLIGHT)),
            Span::styled(format!("{:<18}", field.label()), Style::default().fg(COL_ACCENT)),
            Span::styled(format!("◀ {} ▶", field.value(rule)), value_style),
        ])));
        if matches!(field, EditorField::SecondReactantState | EditorField::BondedAfter) {
            items.push(ListItem::new(Line::from(" ")));
        }
    }
    items.push(ListItem::new(Line::from(" ")));
    items.push(ListItem::new(Line::from(Span::styled(
        rule.to_string(),
        Style::default().fg(COL_SUCCESS).add_modifier(Modifier::BOLD),
    ))));

    f.render_widget(List::new(items), inner);
}

fn draw_rule_table(f: &mut Frame, app: &mut AppState, area: Rect) {
    let header_cells = ["#", "Reaction", "Path"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(COL_HEADER)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    if app.store.rules().is_empty() {
        f.render_widget(
            Paragraph::new("No active rules.\nCompose one in the editor and press Enter.")
                .block(Block::default().borders(Borders::ALL).title(" Active Rules "))
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let rows = app.store.rules().iter().enumerate().map(|(i, r)| {
        let path = if r.bonded_before { "bond toggle" } else { "collision" };
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(r.to_string()),
            Cell::from(path),
        ]).height(1)
    });

    let t = Table::new(rows, &[
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(12),
    ])
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(format!(" Active Rules ({}) ", app.store.rules().len())))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(t, area, &mut app.rule_state);
}

fn draw_census(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Census ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let items: Vec<ListItem> = app.census.populations.iter().map(|(&(kind, state), &count)| {
        ListItem::new(Line::from(vec![
            Span::styled(format!("{}{:<4}", kind, state), Style::default().fg(kind_color(kind)).add_modifier(Modifier::BOLD)),
            Span::raw(format!("{:>4}", count)),
        ]))
    }).collect();

    f.render_widget(List::new(items), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let key = |k: &str, d: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:<14}", k), Style::default().fg(COL_ACCENT)),
            Span::raw(d.to_string()),
        ])
    };

    let text = vec![
        key("1 / 2 / 3", "Simulation / Rules / Help"),
        key("Space", "Pause or resume"),
        key("n", "Single step while paused"),
        key("r", "Respawn atoms (rules kept)"),
        Line::from(" "),
        key("Up/Down j/k", "Select editor field"),
        key("Left/Right h/l", "Change field value"),
        key("Enter", "Submit draft rule (bond toggle runs for bonded-before rules)"),
        key("[ / ]", "Select active rule"),
        key("d", "Delete selected rule"),
        key("c", "Clear all rules"),
        key("w", "Write rules to the --rules file"),
        key("q / Esc", "Quit"),
    ];

    let p = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Keys "))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}
