include!("tests_setup.rs");

use comments_lib::errors::kind_of;

fn pending(ids: &[i32]) -> Vec<Comment> {
    ids.iter().map(|id| create_comment(*id, None, false, true)).collect()
}

fn open_console(storefront: &StorefrontMock, service: &Service) -> ModerationConsole {
    let mut console = ModerationConsole::new(admin_context());
    console.apply_filter(service, CommentsFilter::default()).unwrap();
    storefront.requests.lock().unwrap().clear();
    console
}

#[test]
fn test_bulk_delete_sends_one_request() {
    let storefront = StorefrontMock::with_comments(pending(&[4, 5]));
    let service = create_service(&storefront);
    let mut console = open_console(&storefront, &service);

    console.toggle_select(CommentId(4));
    console.toggle_select(CommentId(5));
    let notification = console.bulk(&service, BulkAction::Delete, &accept).unwrap();

    assert_eq!(notification.text, Message::BulkApplied.text(Locale::Persian));
    assert_eq!(
        storefront.mutations(),
        vec![Request::BulkUpdate(BulkUpdate {
            ids: vec![CommentId(4), CommentId(5)],
            action: BulkAction::Delete,
        })]
    );
    assert!(console.selected().is_empty());
    assert!(console.page().is_empty());
}

#[test]
fn test_select_all_covers_visible_rows_only() {
    let storefront = StorefrontMock::with_comments(pending(&[1, 2, 3, 4, 5]));
    let service = create_service(&storefront);
    let mut console = open_console(&storefront, &service);

    console.toggle_select_all();
    assert_eq!(console.selected(), vec![CommentId(1), CommentId(2)]);
    console.toggle_select_all();
    assert!(console.selected().is_empty());

    console.go_to_page(&service, 3).unwrap();
    console.toggle_select_all();
    assert_eq!(console.selected(), vec![CommentId(5)]);
}

#[test]
fn test_empty_selection_never_sends() {
    let storefront = StorefrontMock::with_comments(pending(&[1]));
    let service = create_service(&storefront);
    let mut console = open_console(&storefront, &service);
    for action in &[BulkAction::Approve, BulkAction::Disapprove, BulkAction::MarkSeen, BulkAction::Delete] {
        let notification = console.bulk(&service, *action, &accept).unwrap();
        assert_eq!(notification.text, Message::SelectAtLeastOne.text(Locale::Persian));
    }
    assert!(storefront.requests().is_empty());
}

#[test]
fn test_filters_round_trip_to_query() {
    let storefront = StorefrontMock::with_comments(pending(&[1, 2, 3]));
    let service = create_service(&storefront);
    let mut console = open_console(&storefront, &service);

    let filter = CommentsFilter {
        search: Some("comment".to_string()),
        approval: ApprovalFilter::Unapproved,
        seen: SeenFilter::Unseen,
        ..Default::default()
    };
    console.apply_filter(&service, filter).unwrap();
    console.go_to_page(&service, 2).unwrap();

    assert_eq!(
        storefront.requests(),
        vec![
            Request::List(vec![
                ("search", "comment".to_string()),
                ("status", "unapproved".to_string()),
                ("seen", "unseen".to_string()),
            ]),
            Request::List(vec![
                ("search", "comment".to_string()),
                ("status", "unapproved".to_string()),
                ("seen", "unseen".to_string()),
                ("page", "2".to_string()),
            ]),
        ]
    );
    assert_eq!(console.page().data.len(), 1);
}

#[test]
fn test_edit_dialog_matches_record() {
    let storefront = StorefrontMock::with_comments(pending(&[9]));
    let service = create_service(&storefront);
    let mut console = open_console(&storefront, &service);

    console.open_edit(CommentId(9)).unwrap();
    {
        let dialog = console.edit_dialog().unwrap();
        assert!(!dialog.approved);
        assert!(dialog.status);
        assert_eq!(dialog.body, "comment 9");
    }

    console.edit_dialog_mut().unwrap().approved = true;
    console.save_edit(&service).unwrap();
    assert_eq!(
        storefront.mutations(),
        vec![Request::Update(
            CommentId(9),
            UpdateComment {
                approved: Some(true),
                ..Default::default()
            }
        )]
    );
    assert!(console.page().data[0].approved);
}

#[test]
fn test_failures_leave_console_usable() {
    let storefront = StorefrontMock::with_comments(pending(&[1, 2]));
    let service = create_service(&storefront);
    let mut console = open_console(&storefront, &service);
    console.toggle_select_all();

    storefront.set_offline(true);
    let notification = console.bulk(&service, BulkAction::MarkSeen, &accept).unwrap();
    assert!(notification.is_error());
    assert_eq!(notification.text, Message::GenericFailure.text(Locale::Persian));
    assert_eq!(console.selected().len(), 2);

    storefront.set_offline(false);
    assert!(!console.bulk(&service, BulkAction::MarkSeen, &accept).unwrap().is_error());
    assert!(console.page().data.iter().all(|comment| comment.seen));
}

#[test]
fn test_declined_delete_sends_nothing() {
    let storefront = StorefrontMock::with_comments(pending(&[1]));
    let service = create_service(&storefront);
    let mut console = open_console(&storefront, &service);
    assert!(console.delete(&service, CommentId(1), &decline).is_none());
    console.toggle_select_all();
    assert!(console.bulk(&service, BulkAction::Delete, &decline).is_none());
    assert!(storefront.requests().is_empty());
}

#[test]
fn test_own_comments_panel() {
    let mut foreign = create_comment(2, None, true, true);
    foreign.author_id = UserId(77);
    let storefront = StorefrontMock::with_comments(vec![create_comment(1, None, false, true), foreign]);
    let service = create_service(&storefront);

    let mut anonymous = OwnComments::new(DynamicContext::default());
    match kind_of(&anonymous.load(&service, 1).unwrap_err()) {
        Some(Error::Forbidden) => {}
        other => panic!("unexpected kind: {:?}", other),
    }
    assert!(storefront.requests().is_empty());

    let mut panel = OwnComments::new(user_context());
    panel.load(&service, 1).unwrap();
    assert_eq!(panel.page().data.len(), 1);
    match kind_of(&panel.edit(&service, CommentId(2), "hijack").unwrap_err()) {
        Some(Error::NotFound) => {}
        other => panic!("unexpected kind: {:?}", other),
    }

    panel.edit(&service, CommentId(1), "ویرایش شد").unwrap();
    assert_eq!(panel.page().data[0].body, "ویرایش شد");
    panel.delete(&service, CommentId(1), &accept).unwrap();
    assert!(panel.page().is_empty());
    assert_eq!(storefront.mutations().len(), 2);
}

#[test]
fn test_emptied_last_page_moves_back() {
    let storefront = StorefrontMock::with_comments(pending(&[1, 2, 3]));
    let service = create_service(&storefront);
    let mut console = open_console(&storefront, &service);
    console.go_to_page(&service, 2).unwrap();
    console.toggle_select_all();
    assert_eq!(console.selected(), vec![CommentId(3)]);

    assert!(!console.bulk(&service, BulkAction::Delete, &accept).unwrap().is_error());

    assert_eq!(console.filter().page, 1);
    assert_eq!(console.page().current_page, 1);
    assert_eq!(console.page().data.len(), 2);
    assert!(!console.render().contains(Message::NoComments.text(Locale::Persian)));
}

#[test]
fn test_unchanged_edit_is_not_reported() {
    let storefront = StorefrontMock::with_comments(pending(&[9]));
    let service = create_service(&storefront);
    let mut console = open_console(&storefront, &service);
    console.open_edit(CommentId(9)).unwrap();
    assert!(console.save_edit(&service).is_none());
    assert!(storefront.requests().is_empty());
}
