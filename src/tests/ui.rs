use super::notes_area;
use ratatui::layout::Rect;

#[test]
fn test_notes_area_wraps_at_configured_width() {
    let area = Rect::new(0, 0, 200, 40);
    let narrowed = notes_area(area, 100);

    assert_eq!(narrowed, Rect::new(0, 0, 102, 40));
}

#[test]
fn test_notes_area_never_grows_past_terminal() {
    let area = Rect::new(5, 1, 60, 20);

    assert_eq!(notes_area(area, 100), area);
    assert_eq!(notes_area(area, usize::MAX), area);
}
