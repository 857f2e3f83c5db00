/// Update function for TEA pattern
///
/// Central update function that handles all messages and updates the model
/// accordingly. This is the only place where page state changes.

use crate::report::DashboardReport;
use crate::tea::command::{ApiCommand, FileSystemCommand, SystemCommand};
use crate::tea::message::{DataMessage, FocusTarget, NotificationMessage, SystemMessage, UIMessage};
use crate::tea::model::Modal;
use crate::tea::{Command, Message, Model, UpdateResult};

/// Toast texts shown to the user
pub const MSG_PRODUCTS_FAILED: &str = "Error cargando productos";
pub const MSG_DETAIL_FAILED: &str = "Error cargando detalle del producto";
pub const MSG_COMPARISON_FAILED: &str = "Error cargando comparación";
pub const MSG_ALERT_CREATED: &str = "¡Alerta creada exitosamente!";
pub const MSG_ALERT_FAILED: &str = "Error creando la alerta";
pub const MSG_REPORT_STARTED: &str = "Generando reporte...";

/// Main update function that processes messages and returns updated model with commands
pub fn update(model: Model, message: Message) -> UpdateResult<Model> {
    match message {
        Message::System(msg) => update_system(model, msg),
        Message::UI(msg) => update_ui(model, msg),
        Message::Data(msg) => update_data(model, msg),
        Message::Notification(msg) => update_notification(model, msg),
    }
}

fn load_products(model: &mut Model) -> Command {
    model.loading.products = true;
    model.products_request += 1;
    Command::api(ApiCommand::LoadProducts {
        request: model.products_request,
        query: model.product_query(),
    })
}

fn load_stats(model: &mut Model) -> Command {
    model.loading.stats = true;
    Command::api(ApiCommand::LoadStats)
}

/// Handle system messages
fn update_system(mut model: Model, message: SystemMessage) -> UpdateResult<Model> {
    match message {
        SystemMessage::Quit => {
            model.should_quit = true;
            UpdateResult::just_model(model)
        }

        SystemMessage::Initialize => {
            // Sequential, in the order the page fills up
            let stats = load_stats(&mut model);
            let products = load_products(&mut model);
            let command = Command::batch(vec![
                stats,
                Command::api(ApiCommand::LoadCategories),
                Command::api(ApiCommand::LoadBrands),
                products,
            ]);
            UpdateResult::with_command(model, command)
        }

        SystemMessage::Tick => {
            model.toasts.update();
            UpdateResult::just_model(model)
        }

        SystemMessage::Resize(width, height) => {
            model.terminal_size = (width, height);
            UpdateResult::just_model(model)
        }
    }
}

/// Handle UI messages
fn update_ui(mut model: Model, message: UIMessage) -> UpdateResult<Model> {
    match message {
        UIMessage::FocusNext => {
            model.focus = model.focus.next();
            UpdateResult::just_model(model)
        }
        UIMessage::FocusPrevious => {
            model.focus = model.focus.previous();
            UpdateResult::just_model(model)
        }
        UIMessage::Focus(target) => {
            model.focus = target;
            UpdateResult::just_model(model)
        }

        UIMessage::SelectNext => {
            if model.selected + 1 < model.products.len() {
                model.selected += 1;
            }
            UpdateResult::just_model(model)
        }
        UIMessage::SelectPrevious => {
            model.selected = model.selected.saturating_sub(1);
            UpdateResult::just_model(model)
        }
        UIMessage::SelectFirst => {
            model.selected = 0;
            UpdateResult::just_model(model)
        }
        UIMessage::SelectLast => {
            model.selected = model.products.len().saturating_sub(1);
            UpdateResult::just_model(model)
        }

        UIMessage::Input(c) => {
            match model.focus {
                FocusTarget::Search => model.filters.search.push(c),
                FocusTarget::AlertForm => model.alert_form.push(c),
                _ => {}
            }
            UpdateResult::just_model(model)
        }
        UIMessage::Backspace => {
            match model.focus {
                FocusTarget::Search => {
                    model.filters.search.pop();
                }
                FocusTarget::AlertForm => model.alert_form.backspace(),
                _ => {}
            }
            UpdateResult::just_model(model)
        }
        UIMessage::ClearInput => {
            match model.focus {
                FocusTarget::Search => model.filters.search.clear(),
                FocusTarget::AlertForm => model.alert_form.clear_field(),
                _ => {}
            }
            UpdateResult::just_model(model)
        }

        UIMessage::CycleCategory(forward) => {
            model.filters.category = cycle(model.filters.category, model.categories.len(), forward);
            let command = load_products(&mut model);
            UpdateResult::with_command(model, command)
        }
        UIMessage::CycleBrand(forward) => {
            model.filters.brand = cycle(model.filters.brand, model.brands.len(), forward);
            let command = load_products(&mut model);
            UpdateResult::with_command(model, command)
        }
        UIMessage::ApplyFilters => {
            let command = load_products(&mut model);
            UpdateResult::with_command(model, command)
        }
        UIMessage::ClearFilters => {
            model.filters = Default::default();
            let command = load_products(&mut model);
            UpdateResult::with_command(model, command)
        }

        UIMessage::OpenDetail => match model.selected_product().map(|p| p.id) {
            Some(product_id) => {
                model.loading.detail = true;
                let command = Command::api(ApiCommand::LoadProductDetail {
                    product_id,
                    history_days: model.settings.history_days,
                });
                UpdateResult::with_command(model, command)
            }
            None => UpdateResult::just_model(model),
        },
        UIMessage::OpenComparison => match model.selected_product().map(|p| p.id) {
            Some(product_id) => {
                model.loading.comparison = true;
                let command = Command::api(ApiCommand::CompareProduct(product_id));
                UpdateResult::with_command(model, command)
            }
            None => UpdateResult::just_model(model),
        },
        UIMessage::CloseModal => {
            model.modal = None;
            UpdateResult::just_model(model)
        }
        UIMessage::ToggleHelp => {
            model.modal = match model.modal {
                Some(Modal::Help) => None,
                _ => Some(Modal::Help),
            };
            UpdateResult::just_model(model)
        }
        UIMessage::ScrollModal(delta) => {
            if let Some(modal) = model.modal.as_mut() {
                modal.scroll_by(delta);
            }
            UpdateResult::just_model(model)
        }

        UIMessage::AlertForSelected => match model.selected_product().map(|p| p.id) {
            Some(product_id) => update_ui(model, UIMessage::AlertForProduct(product_id)),
            None => UpdateResult::just_model(model),
        },
        UIMessage::AlertForProduct(product_id) => {
            model.alert_form.product_id = product_id.to_string();
            model.alert_form.field = crate::tea::model::AlertField::Email;
            model.modal = None;
            model.focus = FocusTarget::AlertForm;
            UpdateResult::just_model(model)
        }
        UIMessage::AlertFieldNext => {
            model.alert_form.field = model.alert_form.field.next();
            UpdateResult::just_model(model)
        }
        UIMessage::AlertFieldPrevious => {
            model.alert_form.field = model.alert_form.field.previous();
            UpdateResult::just_model(model)
        }
        UIMessage::SubmitAlert => {
            if model.loading.alert {
                return UpdateResult::just_model(model);
            }
            match model.alert_form.to_request() {
                Ok(alert) => {
                    model.loading.alert = true;
                    UpdateResult::with_command(model, Command::api(ApiCommand::CreateAlert(alert)))
                }
                Err(reason) => {
                    model.toasts.error(format!("{MSG_ALERT_FAILED}: {reason}"));
                    UpdateResult::just_model(model)
                }
            }
        }
        UIMessage::ResetAlertForm => {
            model.alert_form.reset();
            UpdateResult::just_model(model)
        }

        UIMessage::OpenStoreLink => {
            let url = match &model.modal {
                Some(Modal::ProductDetail { detail, .. }) => detail
                    .cheapest()
                    .and_then(|p| p.url.clone())
                    .or_else(|| detail.current_prices.iter().find_map(|p| p.url.clone())),
                _ => None,
            };
            match url {
                Some(url) => UpdateResult::with_command(model, Command::system(SystemCommand::OpenURL(url))),
                None => {
                    model.toasts.info("No hay enlace disponible para este producto");
                    UpdateResult::just_model(model)
                }
            }
        }

        UIMessage::Refresh => {
            let stats = load_stats(&mut model);
            let products = load_products(&mut model);
            UpdateResult::with_command(model, Command::batch(vec![stats, products]))
        }

        UIMessage::ExportReport => {
            if model.loading.report {
                return UpdateResult::just_model(model);
            }
            let report = DashboardReport::from_model(&model);
            let path = model.settings.report_dir.join(report.file_name());
            model.loading.report = true;
            model.toasts.info(MSG_REPORT_STARTED);
            UpdateResult::with_command(
                model,
                Command::filesystem(FileSystemCommand::ExportReport {
                    path,
                    report: Box::new(report),
                }),
            )
        }
    }
}

/// Step through `None, 0, 1, .., len-1, None`
fn cycle(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match (current, forward) {
        (None, true) => Some(0),
        (None, false) => Some(len - 1),
        (Some(i), true) if i + 1 < len => Some(i + 1),
        (Some(_), true) => None,
        (Some(0), false) => None,
        (Some(i), false) => Some(i.min(len) - 1),
    }
}

/// Handle fetch results
fn update_data(mut model: Model, message: DataMessage) -> UpdateResult<Model> {
    match message {
        DataMessage::StatsLoaded(result) => {
            model.loading.stats = false;
            match result {
                Ok(stats) => model.stats = Some(stats),
                Err(e) => tracing::warn!("Stats unavailable: {}", e),
            }
        }

        DataMessage::CategoriesLoaded(result) => match result {
            Ok(categories) => {
                model.filters.category = None;
                model.categories = categories;
            }
            Err(e) => tracing::warn!("Categories unavailable: {}", e),
        },

        DataMessage::BrandsLoaded(result) => match result {
            Ok(brands) => {
                model.filters.brand = None;
                model.brands = brands;
            }
            Err(e) => tracing::warn!("Brands unavailable: {}", e),
        },

        DataMessage::ProductsLoaded { request, .. } if request != model.products_request => {
            tracing::debug!(
                "Dropping stale product listing {} (latest {})",
                request,
                model.products_request
            );
        }

        DataMessage::ProductsLoaded { result, .. } => {
            model.loading.products = false;
            match result {
                Ok(products) => {
                    tracing::debug!("Loaded {} products", products.len());
                    model.products = products;
                    model.selected = 0;
                }
                Err(_) => model.toasts.error(MSG_PRODUCTS_FAILED),
            }
        }

        DataMessage::DetailLoaded(result) => {
            model.loading.detail = false;
            match result {
                Ok((detail, history)) => {
                    if let Some(cheapest) = detail.cheapest() {
                        model.best_prices.insert(detail.product.id, cheapest.price);
                    }
                    model.modal = Some(Modal::ProductDetail {
                        detail,
                        history,
                        scroll: 0,
                    });
                }
                Err(_) => model.toasts.error(MSG_DETAIL_FAILED),
            }
        }

        DataMessage::ComparisonLoaded(result) => {
            model.loading.comparison = false;
            match result {
                Ok(comparison) => {
                    if let Some(lowest) = comparison.lowest_price() {
                        model.best_prices.insert(comparison.product_id, lowest);
                    }
                    model.modal = Some(Modal::Comparison {
                        comparison,
                        scroll: 0,
                    });
                }
                Err(_) => model.toasts.error(MSG_COMPARISON_FAILED),
            }
        }

        DataMessage::AlertCreated(result) => {
            model.loading.alert = false;
            match result {
                Ok(alert) => {
                    tracing::info!("Alert {} registered", alert.id);
                    model.toasts.success(MSG_ALERT_CREATED);
                    model.alert_form.reset();
                    let command = load_stats(&mut model);
                    return UpdateResult::with_command(model, command);
                }
                Err(_) => model.toasts.error(MSG_ALERT_FAILED),
            }
        }

        DataMessage::ReportExported(result) => {
            model.loading.report = false;
            match result {
                Ok(path) => model
                    .toasts
                    .success(format!("Reporte guardado en {}", path.display())),
                Err(e) => model.toasts.error(format!("Error generando el reporte: {e}")),
            }
        }
    }
    UpdateResult::just_model(model)
}

/// Handle notification messages
fn update_notification(mut model: Model, message: NotificationMessage) -> UpdateResult<Model> {
    match message {
        NotificationMessage::ShowToast(text, level) => {
            model.toasts.show(text, level);
        }
        NotificationMessage::ClearToasts => model.toasts.clear(),
    }
    UpdateResult::just_model(model)
}
