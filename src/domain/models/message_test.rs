use super::Author;
use super::Message;

#[test]
fn it_executes_new() {
    let msg = Message::new(1, Author::Bot, "Hi there!", "2024-03-01T10:15:00Z");
    assert_eq!(msg.id, 1);
    assert_eq!(msg.author, Author::Bot);
    assert_eq!(msg.author.to_string(), "SocialSync");
    assert_eq!(msg.text, "Hi there!".to_string());
    assert!(!msg.is_error);
    assert!(msg.suggestions.is_empty());
    assert_eq!(msg.response_time, None);
}

#[test]
fn it_executes_new_replacing_tabs() {
    let msg = Message::new(1, Author::User, "\t\tHi there!", "2024-03-01T10:15:00Z");
    assert_eq!(msg.text, "    Hi there!".to_string());
}

#[test]
fn it_executes_new_error() {
    let msg = Message::new_error(2, "It broke!", "2024-03-01T10:15:00Z");
    assert_eq!(msg.author, Author::Bot);
    assert_eq!(msg.text, "It broke!".to_string());
    assert!(msg.is_error);
}

#[test]
fn it_caps_visible_suggestions() {
    let msg = Message::new(1, Author::Bot, "Ideas", "2024-03-01T10:15:00Z").with_suggestions(vec![
        "one".to_string(),
        "two".to_string(),
        "three".to_string(),
        "four".to_string(),
    ]);

    assert_eq!(msg.suggestions.len(), 4);
    assert_eq!(msg.visible_suggestions(), ["one", "two", "three"]);
}

#[test]
fn it_formats_footer_with_response_time() {
    let msg = Message::new(1, Author::Bot, "Ideas", "2024-03-01T10:15:00Z")
        .with_response_time(Some(1.84));

    let footer = msg.footer();
    assert!(footer.ends_with(" • 1.8s"));
    assert_eq!(footer.split(' ').next().unwrap().len(), 5);
}

#[test]
fn it_formats_footer_with_unparsable_timestamp() {
    let msg = Message::new(1, Author::Bot, "Ideas", "yesterday");
    assert_eq!(msg.footer(), "yesterday");
}

#[test]
fn it_wraps_lines() {
    let msg = Message::new(
        1,
        Author::Bot,
        "Post daily reels\n\nUse trending audio every time",
        "2024-03-01T10:15:00Z",
    );

    assert_eq!(
        msg.as_string_lines(12),
        vec!["Post daily", "reels", " ", "Use trending", "audio every", "time"]
    );
}
