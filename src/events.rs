use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tea::message::{FocusTarget, NotificationMessage, SystemMessage, UIMessage};
use crate::tea::model::Modal;
use crate::tea::{Message, Model};

/// Translates key presses into messages for the current screen state
#[derive(Debug, Default, Clone, Copy)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Map a key event to a message, `None` when the key does nothing here
    pub fn handle_key_event(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Message::System(SystemMessage::Quit));
        }

        let ui = match &model.modal {
            Some(modal) => self.handle_modal_keys(key, modal),
            None => match model.focus {
                FocusTarget::Search => self.handle_search_keys(key),
                FocusTarget::Category => self.handle_selector_keys(key, UIMessage::CycleCategory),
                FocusTarget::Brand => self.handle_selector_keys(key, UIMessage::CycleBrand),
                FocusTarget::Products => return self.handle_product_keys(key),
                FocusTarget::AlertForm => self.handle_alert_form_keys(key),
            },
        };
        ui.map(Message::UI)
    }

    fn handle_modal_keys(&self, key: KeyEvent, modal: &Modal) -> Option<UIMessage> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(UIMessage::CloseModal),
            KeyCode::Char('?') if matches!(modal, Modal::Help) => Some(UIMessage::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => Some(UIMessage::ScrollModal(1)),
            KeyCode::Char('k') | KeyCode::Up => Some(UIMessage::ScrollModal(-1)),
            KeyCode::PageDown => Some(UIMessage::ScrollModal(10)),
            KeyCode::PageUp => Some(UIMessage::ScrollModal(-10)),
            KeyCode::Char('a') => match modal {
                Modal::ProductDetail { detail, .. } => {
                    Some(UIMessage::AlertForProduct(detail.product.id))
                }
                Modal::Comparison { comparison, .. } => {
                    Some(UIMessage::AlertForProduct(comparison.product_id))
                }
                Modal::Help => None,
            },
            KeyCode::Char('o') if matches!(modal, Modal::ProductDetail { .. }) => {
                Some(UIMessage::OpenStoreLink)
            }
            _ => None,
        }
    }

    fn handle_product_keys(&self, key: KeyEvent) -> Option<Message> {
        let ui = match key.code {
            KeyCode::Char('q') => return Some(Message::System(SystemMessage::Quit)),
            KeyCode::Esc => return Some(Message::Notification(NotificationMessage::ClearToasts)),
            KeyCode::Char('j') | KeyCode::Down => UIMessage::SelectNext,
            KeyCode::Char('k') | KeyCode::Up => UIMessage::SelectPrevious,
            KeyCode::Char('g') | KeyCode::Home => UIMessage::SelectFirst,
            KeyCode::Char('G') | KeyCode::End => UIMessage::SelectLast,
            KeyCode::Enter => UIMessage::OpenDetail,
            KeyCode::Char('c') => UIMessage::OpenComparison,
            KeyCode::Char('a') => UIMessage::AlertForSelected,
            KeyCode::Char('/') => UIMessage::Focus(FocusTarget::Search),
            KeyCode::Char('r') => UIMessage::Refresh,
            KeyCode::Char('e') => UIMessage::ExportReport,
            KeyCode::Char('x') => UIMessage::ClearFilters,
            KeyCode::Char('?') => UIMessage::ToggleHelp,
            KeyCode::Tab => UIMessage::FocusNext,
            KeyCode::BackTab => UIMessage::FocusPrevious,
            _ => return None,
        };
        Some(Message::UI(ui))
    }

    fn handle_search_keys(&self, key: KeyEvent) -> Option<UIMessage> {
        match key.code {
            KeyCode::Enter => Some(UIMessage::ApplyFilters),
            KeyCode::Esc => Some(UIMessage::ClearInput),
            KeyCode::Backspace => Some(UIMessage::Backspace),
            KeyCode::Tab => Some(UIMessage::FocusNext),
            KeyCode::BackTab => Some(UIMessage::FocusPrevious),
            KeyCode::Down => Some(UIMessage::Focus(FocusTarget::Products)),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UIMessage::Input(c))
            }
            _ => None,
        }
    }

    fn handle_selector_keys(&self, key: KeyEvent, cycle: fn(bool) -> UIMessage) -> Option<UIMessage> {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => Some(cycle(true)),
            KeyCode::Left | KeyCode::Char('h') => Some(cycle(false)),
            KeyCode::Char('x') => Some(UIMessage::ClearFilters),
            KeyCode::Tab => Some(UIMessage::FocusNext),
            KeyCode::BackTab => Some(UIMessage::FocusPrevious),
            KeyCode::Esc | KeyCode::Down => Some(UIMessage::Focus(FocusTarget::Products)),
            _ => None,
        }
    }

    fn handle_alert_form_keys(&self, key: KeyEvent) -> Option<UIMessage> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('u') => Some(UIMessage::ClearInput),
                KeyCode::Char('r') => Some(UIMessage::ResetAlertForm),
                _ => None,
            };
        }
        match key.code {
            KeyCode::Enter => Some(UIMessage::SubmitAlert),
            KeyCode::Down => Some(UIMessage::AlertFieldNext),
            KeyCode::Up => Some(UIMessage::AlertFieldPrevious),
            KeyCode::Backspace => Some(UIMessage::Backspace),
            KeyCode::Tab => Some(UIMessage::FocusNext),
            KeyCode::BackTab => Some(UIMessage::FocusPrevious),
            KeyCode::Esc => Some(UIMessage::Focus(FocusTarget::Products)),
            KeyCode::Char(c) => Some(UIMessage::Input(c)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StoreComparison;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ui(message: Option<Message>) -> Option<UIMessage> {
        match message {
            Some(Message::UI(msg)) => Some(msg),
            _ => None,
        }
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let handler = EventHandler::new();
        let mut model = Model::default();
        model.focus = FocusTarget::AlertForm;
        let msg = handler.handle_key_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &model,
        );
        assert!(matches!(msg, Some(Message::System(SystemMessage::Quit))));
    }

    #[test]
    fn test_product_keys() {
        let handler = EventHandler::new();
        let model = Model::default();
        assert!(matches!(
            handler.handle_key_event(key(KeyCode::Char('q')), &model),
            Some(Message::System(SystemMessage::Quit))
        ));
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Enter), &model)),
            Some(UIMessage::OpenDetail)
        ));
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Char('c')), &model)),
            Some(UIMessage::OpenComparison)
        ));
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Char('/')), &model)),
            Some(UIMessage::Focus(FocusTarget::Search))
        ));
        assert!(matches!(
            handler.handle_key_event(key(KeyCode::Esc), &model),
            Some(Message::Notification(NotificationMessage::ClearToasts))
        ));
    }

    #[test]
    fn test_search_captures_letters() {
        let handler = EventHandler::new();
        let mut model = Model::default();
        model.focus = FocusTarget::Search;
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Char('q')), &model)),
            Some(UIMessage::Input('q'))
        ));
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Enter), &model)),
            Some(UIMessage::ApplyFilters)
        ));
    }

    #[test]
    fn test_selector_cycles() {
        let handler = EventHandler::new();
        let mut model = Model::default();
        model.focus = FocusTarget::Brand;
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Left), &model)),
            Some(UIMessage::CycleBrand(false))
        ));
        model.focus = FocusTarget::Category;
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Right), &model)),
            Some(UIMessage::CycleCategory(true))
        ));
    }

    #[test]
    fn test_modal_alert_targets_modal_product() {
        let handler = EventHandler::new();
        let mut model = Model::default();
        model.modal = Some(Modal::Comparison {
            comparison: StoreComparison {
                product_id: 77,
                product: "Atún Florida".into(),
                brand: None,
                category: None,
                price_wong: None,
                price_metro: None,
                price_plaza_vea: None,
                min_price: None,
                max_price: None,
                best_store: None,
                max_savings: None,
            },
            scroll: 0,
        });
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Char('a')), &model)),
            Some(UIMessage::AlertForProduct(77))
        ));
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Esc), &model)),
            Some(UIMessage::CloseModal)
        ));
        assert!(handler.handle_key_event(key(KeyCode::Char('o')), &model).is_none());
    }

    #[test]
    fn test_alert_form_keys() {
        let handler = EventHandler::new();
        let mut model = Model::default();
        model.focus = FocusTarget::AlertForm;
        assert!(matches!(
            ui(handler.handle_key_event(key(KeyCode::Enter), &model)),
            Some(UIMessage::SubmitAlert)
        ));
        assert!(matches!(
            ui(handler.handle_key_event(
                KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
                &model
            )),
            Some(UIMessage::ClearInput)
        ));
    }
}
