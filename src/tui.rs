use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use std::io::stdout;

use emplea::models::{ApplicationStatus, Category, CredentialStatus, JobListing, Tab, REGIONS};
use emplea::query::{ListingQuery, Selector};
use emplea::{ApplyOutcome, EarnOutcome, Session};

struct AppState {
    tab: Tab,
    query: ListingQuery,
    editing_query: bool,
    selected: usize,
    scroll_offset: u16,
    notice: Option<String>,
}

impl AppState {
    fn new(tab: Tab) -> Self {
        Self {
            tab,
            query: ListingQuery::default(),
            editing_query: false,
            selected: 0,
            scroll_offset: 0,
            notice: None,
        }
    }

    fn visible_jobs(&self, session: &Session) -> Vec<JobListing> {
        session.search(&self.query)
    }

    fn row_count(&self, session: &Session) -> usize {
        match self.tab {
            Tab::Explore => self.visible_jobs(session).len(),
            Tab::Applications => session.applications().len(),
            Tab::Credentials => session.credentials().len(),
            Tab::Profile | Tab::Publish => 0,
        }
    }

    fn clamp(&mut self, session: &Session) {
        let rows = self.row_count(session);
        if rows == 0 {
            self.selected = 0;
        } else if self.selected >= rows {
            self.selected = rows - 1;
        }
    }

    fn next(&mut self, session: &Session) {
        if self.selected + 1 < self.row_count(session) {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn switch_tab(&mut self, session: &mut Session, tab: Tab) {
        self.tab = tab;
        self.selected = 0;
        self.scroll_offset = 0;
        self.notice = None;
        session.set_tab(tab);
    }

    fn cycle_region(&mut self) {
        self.query.region = match &self.query.region {
            Selector::Any => Selector::Only(REGIONS[0].to_string()),
            Selector::Only(current) => match REGIONS.iter().position(|r| r == current) {
                Some(i) if i + 1 < REGIONS.len() => Selector::Only(REGIONS[i + 1].to_string()),
                _ => Selector::Any,
            },
        };
        self.selected = 0;
    }

    fn cycle_category(&mut self) {
        self.query.category = match self.query.category {
            Selector::Any => Selector::Only(Category::ALL[0]),
            Selector::Only(current) => match Category::ALL.iter().position(|c| *c == current) {
                Some(i) if i + 1 < Category::ALL.len() => Selector::Only(Category::ALL[i + 1]),
                _ => Selector::Any,
            },
        };
        self.selected = 0;
    }

    fn selected_application_id(&self, session: &Session) -> Option<String> {
        session
            .applications()
            .get(self.selected)
            .map(|a| a.id().to_string())
    }

    fn set_status(&mut self, session: &mut Session, status: ApplicationStatus) {
        let Some(id) = self.selected_application_id(session) else { return };
        if session.set_status(&id, status, None).is_ok() {
            self.notice = Some(format!("{} moved to '{}'", id, status));
        }
    }
}

pub fn run_browse(session: &mut Session) -> Result<()> {
    let mut state = AppState::new(session.active_tab());

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, session);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    session: &mut Session,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        state.clamp(session);
        list_state.select(Some(state.selected));
        terminal.draw(|frame| draw(frame, state, session, &mut list_state))?;

        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if state.editing_query {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => state.editing_query = false,
                KeyCode::Backspace => {
                    state.query.text.pop();
                    state.selected = 0;
                }
                KeyCode::Char(c) => {
                    state.query.text.push(c);
                    state.selected = 0;
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Tab => state.switch_tab(session, state.tab.next()),
            KeyCode::BackTab => state.switch_tab(session, state.tab.prev()),
            KeyCode::Down | KeyCode::Char('j') => state.next(session),
            KeyCode::Up | KeyCode::Char('k') => state.prev(),
            KeyCode::PageDown => state.scroll_offset = state.scroll_offset.saturating_add(3),
            KeyCode::PageUp => state.scroll_offset = state.scroll_offset.saturating_sub(3),
            KeyCode::Char('R') => {
                let role = session.toggle_role();
                state.notice = Some(format!("Role: {}", role));
            }
            code => handle_tab_key(state, session, code),
        }
    }
    Ok(())
}

fn handle_tab_key(state: &mut AppState, session: &mut Session, code: KeyCode) {
    match (state.tab, code) {
        (Tab::Explore, KeyCode::Char('/')) => state.editing_query = true,
        (Tab::Explore, KeyCode::Char('r')) => state.cycle_region(),
        (Tab::Explore, KeyCode::Char('c')) => state.cycle_category(),
        (Tab::Explore, KeyCode::Char('a')) => {
            let Some(job) = state.visible_jobs(session).into_iter().nth(state.selected) else {
                return;
            };
            state.notice = Some(match session.apply(&job.id) {
                ApplyOutcome::Applied => format!("Applied to {}", job.id),
                ApplyOutcome::AlreadyApplied => format!("Already applied to {}", job.id),
                ApplyOutcome::UnknownListing => format!("{} is gone", job.id),
            });
        }
        (Tab::Applications, KeyCode::Char('v')) => {
            state.set_status(session, ApplicationStatus::UnderReview)
        }
        (Tab::Applications, KeyCode::Char('i')) => {
            state.set_status(session, ApplicationStatus::Interview)
        }
        (Tab::Applications, KeyCode::Char('o')) => state.set_status(session, ApplicationStatus::Offer),
        (Tab::Applications, KeyCode::Char('x')) => {
            state.set_status(session, ApplicationStatus::Rejected)
        }
        (Tab::Applications, KeyCode::Char('d')) => {
            if let Some(id) = state.selected_application_id(session) {
                session.cancel(&id);
                state.notice = Some(format!("Application to {} withdrawn", id));
            }
        }
        (Tab::Credentials, KeyCode::Char('e')) => {
            let Some(id) = session.credentials().get(state.selected).map(|c| c.id.clone()) else {
                return;
            };
            if let Ok(outcome) = session.earn_credential(&id) {
                state.notice = Some(match outcome {
                    EarnOutcome::Earned => format!("Earned {}", id),
                    EarnOutcome::AlreadyEarned => format!("{} already earned", id),
                });
            }
        }
        _ => {}
    }
}

fn draw(frame: &mut Frame, state: &AppState, session: &Session, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" emplea - {} ", session.role())),
        )
        .select(state.tab.index())
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));
    frame.render_widget(tabs, rows[0]);

    match state.tab {
        Tab::Explore => draw_explore(frame, rows[1], state, session, list_state),
        Tab::Applications => draw_applications(frame, rows[1], state, session, list_state),
        Tab::Credentials => draw_credentials(frame, rows[1], state, session, list_state),
        Tab::Profile => draw_profile(frame, rows[1], session),
        Tab::Publish => draw_publish(frame, rows[1]),
    }

    let help = match state.tab {
        _ if state.editing_query => " type to search  enter:done".to_string(),
        Tab::Explore => " /:search r:region c:category a:apply".to_string(),
        Tab::Applications => " v:review i:interview o:offer x:reject d:cancel".to_string(),
        Tab::Credentials => " e:earn".to_string(),
        Tab::Profile | Tab::Publish => String::new(),
    };
    let footer = match &state.notice {
        Some(notice) => format!("{}  |  {}", notice, help.trim()),
        None => format!("{}  tab:view R:role j/k:navigate q:quit", help),
    };
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );
}

fn split_panels(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area)
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: String,
    items: Vec<ListItem>,
    list_state: &mut ListState,
) {
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, list_state);
}

fn render_detail(frame: &mut Frame, area: Rect, text: Text, scroll: u16) {
    let detail = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(detail, area);
}

fn draw_explore(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    session: &Session,
    list_state: &mut ListState,
) {
    let chunks = split_panels(area);
    let jobs = state.visible_jobs(session);

    let items: Vec<ListItem> = jobs
        .iter()
        .map(|job| {
            let marker = if session.has_applied(&job.id) { "+" } else { " " };
            ListItem::new(format!("{} {} {} | {}", marker, job.id, job.title, job.organization))
        })
        .collect();

    let cursor = if state.editing_query { "_" } else { "" };
    let title = format!(
        " \"{}{}\" region:{} category:{} ({}) ",
        state.query.text,
        cursor,
        state.query.region,
        state.query.category,
        jobs.len()
    );
    render_list(frame, chunks[0], title, items, list_state);

    let text = match jobs.get(state.selected) {
        Some(job) => listing_detail(job),
        None => Text::from(Span::styled(
            "No results for the applied filters.",
            Style::default().fg(Color::DarkGray),
        )),
    };
    render_detail(frame, chunks[1], text, state.scroll_offset);
}

fn listing_detail(job: &JobListing) -> Text<'static> {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        job.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!(
        "{} - {}, {}",
        job.organization, job.locality, job.region
    )));
    lines.push(Line::from(Span::styled(
        format!("{} | {} | {}", job.category, job.work_mode, job.hours_per_week),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::from(""));
    for line in textwrap::fill(&job.description, 70).lines() {
        lines.push(Line::from(line.to_string()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Requirements",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for req in &job.requirements {
        lines.push(Line::from(format!("  - {}", req)));
    }
    Text::from(lines)
}

fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::UnderReview => Style::default().fg(Color::Yellow),
        ApplicationStatus::Interview => Style::default().fg(Color::Cyan),
        ApplicationStatus::Offer => Style::default().fg(Color::Green),
        ApplicationStatus::Rejected => Style::default().fg(Color::Red),
    }
}

fn draw_applications(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    session: &Session,
    list_state: &mut ListState,
) {
    let applications = session.applications();
    if applications.is_empty() {
        let empty = Paragraph::new(
            "You haven't applied yet. Explore listings to start your first experience.",
        )
        .block(Block::default().borders(Borders::ALL).title(" Applications "))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let chunks = split_panels(area);
    let items: Vec<ListItem> = applications
        .iter()
        .map(|app| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} {} ", app.id(), app.listing.title)),
                Span::styled(format!("[{}]", app.status), status_style(app.status)),
            ]))
        })
        .collect();
    render_list(
        frame,
        chunks[0],
        format!(" Applications ({}) ", applications.len()),
        items,
        list_state,
    );

    let Some(app) = applications.get(state.selected) else { return };
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        app.listing.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!(
        "{} - {}",
        app.listing.organization, app.listing.locality
    )));
    lines.push(Line::from(Span::styled(
        format!("Status: {}", app.status),
        status_style(app.status),
    )));
    lines.push(Line::from(format!("Applied: {}", app.applied_at)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "History",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for entry in &app.history {
        lines.push(Line::from(vec![
            Span::raw("  - "),
            Span::styled(entry.status.label(), status_style(entry.status)),
            Span::styled(
                format!(" - {}", entry.timestamp),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    render_detail(frame, chunks[1], Text::from(lines), state.scroll_offset);
}

fn draw_credentials(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    session: &Session,
    list_state: &mut ListState,
) {
    let chunks = split_panels(area);
    let credentials = session.credentials();

    let items: Vec<ListItem> = credentials
        .iter()
        .map(|cred| {
            let (label, style) = match cred.status {
                CredentialStatus::Earned => ("Earned", Style::default().fg(Color::Green)),
                CredentialStatus::Pending => ("Pending", Style::default().fg(Color::DarkGray)),
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", cred.name)),
                Span::styled(format!("[{}]", label), style),
            ]))
        })
        .collect();
    render_list(frame, chunks[0], " Micro-credentials ".to_string(), items, list_state);

    let text = match credentials.get(state.selected) {
        Some(cred) => Text::from(vec![
            Line::from(Span::styled(
                cred.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(cred.description.clone()),
        ]),
        None => Text::raw(""),
    };
    render_detail(frame, chunks[1], text, state.scroll_offset);
}

fn draw_profile(frame: &mut Frame, area: Rect, session: &Session) {
    let profile = session.profile();
    let text = vec![
        Line::from(format!("Name:           {}", profile.name)),
        Line::from(format!("Email:          {}", profile.email)),
        Line::from(format!("Field of study: {}", profile.field_of_study)),
        Line::from(format!("Locality:       {}", profile.locality)),
        Line::from(""),
        Line::from(Span::styled(
            "Edit with: emplea profile set --name ... --email ... --field ... --locality ...",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let widget = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Profile "));
    frame.render_widget(widget, area);
}

fn draw_publish(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from("Publish a listing from the command line:"),
        Line::from(""),
        Line::from("  emplea publish --title \"UX Internship\" --organization Acme \\"),
        Line::from("    --locality Santiago --category Internship \\"),
        Line::from("    --requirements \"Figma, Teamwork\" --description \"...\""),
        Line::from(""),
        Line::from(Span::styled(
            "Title, locality and description are required.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Publish (Organization) "))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}
