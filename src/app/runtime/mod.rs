use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;

use crate::{
    domain::{FieldSchema, SubmittedStore},
    form::{FormSession, SessionError, SubmitOutcome},
    presentation::{self, Pane, UiContext},
    storage::KeyValueStore,
};

use super::{
    input::{self, KeyAction, KeyCommand},
    keymap::{self, KeymapContext},
    options::UiOptions,
    popup::{PopupState, PopupTarget},
    status::StatusLine,
    terminal::TerminalGuard,
};

const POPUP_HINT: &str = "Use ↑/↓ and Enter to choose";
const RECORDS_HINT: &str = "Select an entry with ↑/↓, e to edit, d to delete";
const NO_ENTRIES: &str = "No entries submitted yet";

pub(crate) struct App<S> {
    session: FormSession<S>,
    options: UiOptions,
    status: StatusLine,
    pane: Pane,
    /// 0 is the category selector, `n` the n-th field.
    form_focus: usize,
    /// Row position across every records table.
    record_focus: usize,
    popup: Option<PopupState>,
    exit_armed: bool,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(session: FormSession<S>, options: UiOptions) -> Self {
        let mut app = Self {
            session,
            options,
            status: StatusLine::new(),
            pane: Pane::Form,
            form_focus: 0,
            record_focus: 0,
            popup: None,
            exit_armed: false,
            should_quit: false,
        };
        if let Some(category) = app.options.initial_category.clone() {
            app.select_category(&category);
        }
        app
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                Event::Mouse(_) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
        Ok(())
    }

    pub fn into_store(self) -> SubmittedStore {
        self.session.store().clone()
    }

    fn keymap_context(&self) -> KeymapContext {
        match self.pane {
            Pane::Form => KeymapContext::Form,
            Pane::Records => KeymapContext::Records,
        }
    }

    fn current_help_text(&self) -> Option<String> {
        if !self.options.show_help {
            return None;
        }
        keymap::help_text(self.keymap_context())
    }

    fn focused_field(&self) -> Option<&FieldSchema> {
        self.form_focus
            .checked_sub(1)
            .and_then(|idx| self.session.fields().get(idx))
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.handle_popup_key(key) {
            return;
        }
        match input::classify(self.keymap_context(), &key) {
            KeyCommand::Action(action) => self.handle_action(action),
            KeyCommand::Edit(event) if self.pane == Pane::Form => self.handle_field_input(&event),
            KeyCommand::Edit(_) => {}
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> bool {
        let Some(popup) = &mut self.popup else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.popup = None;
                self.focus_status();
            }
            KeyCode::Up => popup.select_previous(),
            KeyCode::Down => popup.select_next(),
            KeyCode::Enter => {
                let target = popup.target().clone();
                let value = popup.selected_value().unwrap_or_default().to_string();
                self.popup = None;
                match target {
                    PopupTarget::Category => self.select_category(&value),
                    PopupTarget::Field(name) => self.apply_input(&name, value),
                }
            }
            _ => {}
        }
        true
    }

    fn handle_action(&mut self, action: KeyAction) {
        if action != KeyAction::Quit {
            self.exit_armed = false;
        }
        match action {
            KeyAction::Submit => self.on_submit(),
            KeyAction::Quit => self.on_exit(),
            KeyAction::DismissFeedback => {
                self.session.dismiss_feedback();
                self.focus_status();
            }
            KeyAction::FieldStep(delta) => {
                let slots = self.session.fields().len() as i32 + 1;
                let next = (self.form_focus as i32 + delta).rem_euclid(slots);
                self.form_focus = next as usize;
                self.focus_status();
            }
            KeyAction::OpenPopup => self.open_popup(),
            KeyAction::TogglePane => {
                self.pane = match self.pane {
                    Pane::Form => Pane::Records,
                    Pane::Records => Pane::Form,
                };
                self.clamp_record_focus();
                self.focus_status();
            }
            KeyAction::RowStep(delta) => {
                let total = self.total_rows();
                if total > 0 {
                    let next = (self.record_focus as i64 + i64::from(delta)).clamp(0, total as i64 - 1);
                    self.record_focus = next as usize;
                }
            }
            KeyAction::EditRecord => self.on_edit_record(),
            KeyAction::DeleteRecord => self.on_delete_record(),
        }
    }

    fn handle_field_input(&mut self, event: &KeyEvent) {
        if self.form_focus == 0 {
            let delta = match event.code {
                KeyCode::Left => -1,
                KeyCode::Right => 1,
                _ => return,
            };
            let names: Vec<String> = self.session.catalog().names().map(str::to_string).collect();
            let current = self.session.category().unwrap_or_default();
            let next = input::cycle_option(&names, current, delta);
            self.select_category(&next);
            return;
        }
        let Some(next) = self
            .focused_field()
            .and_then(|field| input::edited_value(field, self.session.value(&field.name), event))
        else {
            return;
        };
        if let Some(name) = self.focused_field().map(|field| field.name.clone()) {
            self.exit_armed = false;
            self.apply_input(&name, next);
        }
    }

    fn apply_input(&mut self, name: &str, value: String) {
        let Some(field) = self.session.fields().iter().find(|field| field.name == name) else {
            return;
        };
        let (display, label) = (field.display_label(), field.label.clone());
        if self.session.input(name, value) {
            self.status.editing(&display);
        } else {
            self.status.rejected_input(&label);
        }
    }

    fn select_category(&mut self, category: &str) {
        self.session.select_category(category);
        self.form_focus = 0;
        self.status.category_selected(self.session.category());
    }

    fn open_popup(&mut self) {
        let popup = if self.form_focus == 0 {
            Some(PopupState::for_category(
                self.session.catalog().names(),
                self.session.category(),
            ))
        } else {
            self.focused_field().and_then(|field| {
                PopupState::for_field(
                    &field.name,
                    &field.label,
                    &field.options,
                    self.session.value(&field.name),
                )
            })
        };
        if popup.is_some() {
            self.status.set_raw(POPUP_HINT);
            self.popup = popup;
        }
    }

    fn on_submit(&mut self) {
        match self.session.submit() {
            Ok(SubmitOutcome::Invalid { issues }) => self.status.issues_remaining(issues),
            Ok(SubmitOutcome::Created { .. } | SubmitOutcome::Edited { .. }) => {
                self.announce_feedback();
                self.clamp_record_focus();
            }
            Err(err) => self.report(err),
        }
    }

    fn on_edit_record(&mut self) {
        let Some((category, index)) = self.selected_record() else {
            self.status.set_raw(NO_ENTRIES);
            return;
        };
        match self.session.edit(&category, index) {
            Ok(()) => {
                self.pane = Pane::Form;
                self.form_focus = usize::from(!self.session.fields().is_empty());
                self.status.editing_record(&category, index);
            }
            Err(err) => self.report(err),
        }
    }

    fn on_delete_record(&mut self) {
        let Some((category, index)) = self.selected_record() else {
            self.status.set_raw(NO_ENTRIES);
            return;
        };
        match self.session.delete(&category, index) {
            Ok(()) => {
                self.clamp_record_focus();
                self.announce_feedback();
            }
            Err(err) => self.report(err),
        }
    }

    fn on_exit(&mut self) {
        let has_input = self.session.values().values().any(|value| !value.is_empty());
        if self.options.confirm_exit && has_input && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }

    fn announce_feedback(&mut self) {
        if let Some(feedback) = self.session.feedback() {
            self.status.set_raw(feedback.message());
        }
    }

    fn report(&mut self, err: SessionError) {
        self.status.set_raw(format!("{:#}", anyhow::Error::from(err)));
    }

    fn focus_status(&mut self) {
        if self.pane == Pane::Records {
            self.status.set_raw(RECORDS_HINT);
            return;
        }
        match self.focused_field() {
            Some(field) => {
                let label = field.display_label();
                self.status.editing(&label);
            }
            None => self.status.category_selected(self.session.category()),
        }
    }

    fn total_rows(&self) -> usize {
        self.session
            .store()
            .categories()
            .map(|(_, records)| records.len())
            .sum()
    }

    fn clamp_record_focus(&mut self) {
        self.record_focus = self.record_focus.min(self.total_rows().saturating_sub(1));
    }

    /// Category and index of the highlighted row, counting rows in render order.
    fn selected_record(&self) -> Option<(String, usize)> {
        let mut offset = self.record_focus;
        for (category, records) in self.session.store().categories() {
            if offset < records.len() {
                return Some((category.to_string(), offset));
            }
            offset -= records.len();
        }
        None
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = self.current_help_text();
        let tables = self.session.record_tables();
        presentation::draw(
            frame,
            UiContext {
                title: &self.options.title,
                category: self.session.category(),
                fields: self.session.fields(),
                values: self.session.values(),
                errors: self.session.errors(),
                progress: self.session.progress(),
                feedback: self.session.feedback(),
                edit_cursor: self.session.edit_cursor(),
                tables: &tables,
                pane: self.pane,
                form_focus: self.form_focus,
                record_focus: self.record_focus,
                status_message: self.status.message(),
                help: help.as_deref(),
                popup: self.popup.as_ref().map(PopupState::as_render),
            },
        );
    }
}
