//! Integration tests for the NewBill page: attachment staging, native form
//! validation and the upload-then-write submission.

mod common;

use billed::core::error::ValidationError;
use billed::prelude::*;
use common::*;
use std::sync::Arc;

fn controller(store: InMemoryBillStore, log: &NavigationLog) -> NewBillController {
    NewBillController::new(
        Document::new(),
        Arc::new(log.clone()),
        Arc::new(store),
        employee(),
        AttachmentPolicy::default(),
    )
}

async fn new_bill_page(app: &App) -> NewBillController {
    match app.on_navigate(Route::NewBill).await.unwrap() {
        Page::NewBill(controller) => controller,
        Page::Bills(_) => panic!("expected the NewBill page"),
    }
}

mod new_bill_page_tests {
    use super::*;

    #[tokio::test]
    async fn test_mail_icon_is_highlighted() {
        let app = app_with(InMemoryBillStore::default());
        let controller = new_bill_page(&app).await;
        let document = controller.document();

        assert!(document.get_by_test_id("icon-mail").unwrap().has_class("active-icon"));
        assert!(!document.get_by_test_id("icon-window").unwrap().has_class("active-icon"));
        assert!(document.has_text("Envoyer une note de frais"));
    }

    #[tokio::test]
    async fn test_form_exposes_every_control() {
        let app = app_with(InMemoryBillStore::default());
        let controller = new_bill_page(&app).await;
        let document = controller.document();

        for id in [
            "form-new-bill",
            "expense-type",
            "expense-name",
            "datepicker",
            "amount",
            "vat",
            "pct",
            "commentary",
            "file",
        ] {
            assert!(document.get_by_test_id(id).is_some(), "missing control {}", id);
        }

        let file = document.get_by_test_id("file").unwrap();
        assert_eq!(file.attr("accept"), Some(".jpg,.jpeg,.png"));
        assert_eq!(file.attr("required"), Some(""));
        assert!(document.get_by_test_id("invalid-fields").is_none());
    }
}

mod attachment_tests {
    use super::*;

    #[test]
    fn test_image_extensions_are_staged() {
        for name in ["facture.png", "facture.jpg", "facture.jpeg", "FACTURE.JPG"] {
            let log = NavigationLog::new();
            let mut controller = controller(InMemoryBillStore::default(), &log);
            let mut input = FileInput::default();
            input.select(png(name));

            let change = controller.handle_change_file(&mut input);

            assert_eq!(
                change,
                FileChange::Staged {
                    file_name: name.to_string()
                }
            );
            assert_eq!(input.files().len(), 1);
            assert_eq!(input.files()[0].name, name);
            assert_eq!(controller.file_name(), Some(name));
        }
    }

    #[test]
    fn test_other_extensions_clear_the_input() {
        let log = NavigationLog::new();
        let mut controller = controller(InMemoryBillStore::default(), &log);
        let mut input = FileInput::default();
        input.select(SelectedFile::new("facture.pdf", "application/pdf", b"%PDF".to_vec()));

        let change = controller.handle_change_file(&mut input);

        assert_eq!(
            change,
            FileChange::Rejected {
                file_name: "facture.pdf".to_string()
            }
        );
        assert_eq!(input.value(), "");
        assert!(input.files().is_empty());
        assert_eq!(controller.stage(), &FileStage::Empty);
    }

    #[test]
    fn test_rejected_file_replaces_a_staged_one() {
        let log = NavigationLog::new();
        let mut controller = controller(InMemoryBillStore::default(), &log);
        let mut input = FileInput::default();

        input.select(png("facture.png"));
        controller.handle_change_file(&mut input);
        input.select(SelectedFile::new("virus.exe", "application/octet-stream", vec![]));
        controller.handle_change_file(&mut input);

        assert_eq!(controller.stage(), &FileStage::Empty);
        assert_eq!(controller.file_name(), None);
    }

    #[test]
    fn test_empty_selection_clears_the_stage() {
        let log = NavigationLog::new();
        let mut controller = controller(InMemoryBillStore::default(), &log);
        let mut input = FileInput::default();

        assert_eq!(controller.handle_change_file(&mut input), FileChange::Cleared);
        assert_eq!(controller.stage(), &FileStage::Empty);
    }
}

mod submit_tests {
    use super::*;

    #[tokio::test]
    async fn test_valid_form_is_submitted() {
        let store = InMemoryBillStore::default();
        let log = NavigationLog::new();
        let mut controller = controller(store.clone(), &log);

        let mut form = valid_form();
        controller.handle_change_file(form.file_mut());

        for field in FormField::ALL {
            assert!(form.validity(field).valid(), "{} should be valid", field);
        }
        assert!(form.file().validity().valid());

        let submits = CallCounter::new();
        let mut event = SubmitEvent::new(form);
        let outcome = {
            let mut handle_submit = async |event: &mut SubmitEvent| {
                submits.record();
                controller.handle_submit(event).await
            };
            handle_submit(&mut event).await.unwrap()
        };

        assert_eq!(submits.count(), 1);
        assert!(event.default_prevented());

        let bill = match outcome {
            SubmitOutcome::Created(bill) => bill,
            other => panic!("expected a created bill, got {:?}", other),
        };
        assert_eq!(bill.email, EMPLOYEE_EMAIL);
        assert_eq!(bill.expense_type, "Hôtel et logement");
        assert_eq!(bill.name, "Déplacement");
        assert_eq!(bill.amount, 150.0);
        assert_eq!(bill.date, "2024-01-02");
        assert_eq!(bill.vat, Some(80.0));
        assert_eq!(bill.pct, 25);
        assert_eq!(bill.commentary.as_deref(), Some("Séminaire"));
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.file_name.as_deref(), Some("facture.png"));

        let file = store.file(&bill.id).expect("attachment is stored under the bill id");
        assert_eq!(file.file_name, "facture.png");
        assert_eq!(file.email.as_deref(), Some(EMPLOYEE_EMAIL));
        assert_eq!(
            bill.file_url,
            Some(format!("http://localhost:5678/uploads/{}/facture.png", bill.id))
        );

        assert_eq!(store.len(), 1);
        assert_eq!(log.routes(), vec![Route::Bills]);
        assert_eq!(controller.stage(), &FileStage::Submitted);
    }

    #[tokio::test]
    async fn test_invalid_form_is_blocked() {
        let store = InMemoryBillStore::default();
        let log = NavigationLog::new();
        let mut controller = controller(store.clone(), &log);

        let mut form = NewBillForm::new();
        form.change(FormField::ExpenseType, "test");
        form.change(FormField::Amount, "test");
        form.change(FormField::Date, "date incorrecte");
        form.change(FormField::Pct, "test");

        for field in [
            FormField::ExpenseType,
            FormField::Date,
            FormField::Amount,
            FormField::Pct,
        ] {
            assert!(!form.validity(field).valid(), "{} should be invalid", field);
        }

        let submits = CallCounter::new();
        let mut event = SubmitEvent::new(form);
        let outcome = {
            let mut handle_submit = async |event: &mut SubmitEvent| {
                submits.record();
                controller.handle_submit(event).await
            };
            handle_submit(&mut event).await.unwrap()
        };

        assert_eq!(submits.count(), 1);
        assert!(event.default_prevented());
        assert_eq!(
            outcome,
            SubmitOutcome::Blocked {
                invalid_fields: vec![
                    "expense-type".to_string(),
                    "datepicker".to_string(),
                    "amount".to_string(),
                    "pct".to_string(),
                    "file".to_string(),
                ]
            }
        );
        assert!(store.is_empty());
        assert!(log.routes().is_empty());
    }

    #[tokio::test]
    async fn test_submission_reads_the_form_file_when_no_change_was_handled() {
        let store = InMemoryBillStore::default();
        let log = NavigationLog::new();
        let mut controller = controller(store.clone(), &log);

        let mut event = SubmitEvent::new(valid_form());
        let outcome = controller.handle_submit(&mut event).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unstaged_file_with_bad_extension_is_refused() {
        let log = NavigationLog::new();
        let mut controller = controller(InMemoryBillStore::default(), &log);

        let mut form = valid_form();
        form.file_mut()
            .select(SelectedFile::new("facture.pdf", "application/pdf", vec![]));
        let mut event = SubmitEvent::new(form);

        let err = controller.handle_submit(&mut event).await.unwrap_err();
        assert!(matches!(
            err,
            BilledError::Validation(ValidationError::FileExtension { .. })
        ));
        assert!(log.routes().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_keeps_the_file_staged() {
        let store = InMemoryBillStore::default();
        store.fail_next(StoreOperation::Create, StoreError::http(500));
        let log = NavigationLog::new();
        let mut controller = controller(store.clone(), &log);

        let mut form = valid_form();
        controller.handle_change_file(form.file_mut());
        let mut event = SubmitEvent::new(form);

        let err = controller.handle_submit(&mut event).await.unwrap_err();

        assert_eq!(err.to_string(), "Erreur 500");
        assert!(matches!(controller.stage(), FileStage::Staged(_)));
        assert!(store.is_empty());
        assert!(log.routes().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_the_upload() {
        let store = InMemoryBillStore::default();
        store.fail_next(StoreOperation::Update, StoreError::http(404));
        let log = NavigationLog::new();
        let mut controller = controller(store.clone(), &log);

        let mut form = valid_form();
        controller.handle_change_file(form.file_mut());
        let mut event = SubmitEvent::new(form);

        let err = controller.handle_submit(&mut event).await.unwrap_err();

        assert_eq!(err.to_string(), "Erreur 404");
        let FileStage::Uploaded { file_name, receipt } = controller.stage() else {
            panic!("expected an uploaded attachment");
        };
        assert_eq!(file_name, "facture.png");
        assert!(store.file(&receipt.key).is_some());
        assert!(store.is_empty());
        assert!(log.routes().is_empty());
    }

    #[tokio::test]
    async fn test_blank_vat_is_stored_as_none() {
        let store = InMemoryBillStore::default();
        let log = NavigationLog::new();
        let mut controller = controller(store, &log);

        let mut form = valid_form();
        form.change(FormField::Vat, "");
        form.change(FormField::Commentary, "");
        let mut event = SubmitEvent::new(form);

        let SubmitOutcome::Created(bill) = controller.handle_submit(&mut event).await.unwrap() else {
            panic!("expected a created bill");
        };
        assert_eq!(bill.vat, None);
        assert_eq!(bill.commentary, None);
    }

    #[tokio::test]
    async fn test_submitted_bill_shows_bills_page() {
        let store = InMemoryBillStore::default();
        let app = app_with(store.clone());
        let mut controller = new_bill_page(&app).await;

        let mut form = valid_form();
        controller.handle_change_file(form.file_mut());
        let mut event = SubmitEvent::new(form);
        controller.handle_submit(&mut event).await.unwrap();

        assert_eq!(app.pending(), Some(Route::Bills));
        assert!(app.document().get_by_test_id("form-new-bill").is_none());

        let page = app.settle().await.unwrap().expect("a page was requested");
        assert_eq!(page.route(), Route::Bills);
        assert_eq!(app.pending(), None);

        let document = app.document();
        assert!(document.has_text("Mes notes de frais"));
        assert!(document.has_text("Déplacement"));
        assert!(document.has_text("2 Jan. 24"));
        assert!(document.has_text("En attente"));
        assert_eq!(document.query_all_by_test_id("icon-eye").len(), 1);
    }

    #[tokio::test]
    async fn test_settle_without_navigation_mounts_nothing() {
        let app = app_with(InMemoryBillStore::default());
        new_bill_page(&app).await;

        assert!(app.settle().await.unwrap().is_none());
        assert!(app.document().get_by_test_id("form-new-bill").is_some());
    }

    #[tokio::test]
    async fn test_input_changed_after_staging_uploads_the_current_file() {
        let store = InMemoryBillStore::default();
        let log = NavigationLog::new();
        let mut controller = controller(store.clone(), &log);

        let mut form = valid_form();
        controller.handle_change_file(form.file_mut());
        form.file_mut().select(png("taxi.jpg"));
        let mut event = SubmitEvent::new(form);

        let SubmitOutcome::Created(bill) = controller.handle_submit(&mut event).await.unwrap() else {
            panic!("expected a created bill");
        };
        assert_eq!(bill.file_name.as_deref(), Some("taxi.jpg"));
        assert_eq!(store.file(&bill.id).unwrap().file_name, "taxi.jpg");
    }

    #[tokio::test]
    async fn test_input_swapped_for_a_refused_file_after_staging() {
        let store = InMemoryBillStore::default();
        let log = NavigationLog::new();
        let mut controller = controller(store.clone(), &log);

        let mut form = valid_form();
        controller.handle_change_file(form.file_mut());
        form.file_mut()
            .select(SelectedFile::new("facture.pdf", "application/pdf", vec![]));
        let mut event = SubmitEvent::new(form);

        let err = controller.handle_submit(&mut event).await.unwrap_err();
        assert!(matches!(
            err,
            BilledError::Validation(ValidationError::FileExtension { .. })
        ));
        assert!(store.is_empty());
    }
}

mod pct_tests {
    use super::*;

    #[test]
    fn test_fractional_pct_is_a_step_mismatch() {
        for raw in ["2.5", "99.99"] {
            let mut form = valid_form();
            form.change(FormField::Pct, raw);

            let validity = form.validity(FormField::Pct);
            assert_eq!(form.value(FormField::Pct), raw);
            assert!(validity.step_mismatch, "{} should mismatch the step", raw);
            assert!(!validity.valid());
        }
    }

    #[test]
    fn test_pct_outside_percentage_range_is_invalid() {
        let mut form = valid_form();
        form.change(FormField::Pct, "1e30");
        assert!(form.validity(FormField::Pct).range_overflow);

        form.change(FormField::Pct, "-5");
        assert!(form.validity(FormField::Pct).range_underflow);

        form.change(FormField::Pct, "100");
        assert!(form.validity(FormField::Pct).valid());
    }

    #[tokio::test]
    async fn test_non_integer_pct_blocks_submission() {
        for raw in ["2.5", "99.99", "1e30"] {
            let store = InMemoryBillStore::default();
            let log = NavigationLog::new();
            let mut controller = controller(store.clone(), &log);

            let mut form = valid_form();
            form.change(FormField::Pct, raw);
            let mut event = SubmitEvent::new(form);

            let outcome = controller.handle_submit(&mut event).await.unwrap();

            assert_eq!(
                outcome,
                SubmitOutcome::Blocked {
                    invalid_fields: vec!["pct".to_string()]
                },
                "pct {}",
                raw
            );
            assert!(store.is_empty());
        }
    }

    #[tokio::test]
    async fn test_blank_pct_blocks_submission() {
        let log = NavigationLog::new();
        let mut controller = controller(InMemoryBillStore::default(), &log);

        let mut form = valid_form();
        form.change(FormField::Pct, "");
        let mut event = SubmitEvent::new(form);

        let outcome = controller.handle_submit(&mut event).await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Blocked {
                invalid_fields: vec!["pct".to_string()]
            }
        );
    }
}
