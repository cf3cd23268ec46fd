use super::Scroll;

fn scroll(list_length: usize, viewport_length: usize) -> Scroll {
    let mut scroll = Scroll::default();
    scroll.set_state(list_length, viewport_length);
    return scroll;
}

#[test]
fn it_stops_at_the_top() {
    let mut scroll = scroll(100, 20);
    scroll.up();
    assert_eq!(scroll.position, 0);
}

#[test]
fn it_stops_at_the_bottom() {
    let mut scroll = scroll(25, 20);
    scroll.down_page();
    assert_eq!(scroll.position, 5);
}

#[test]
fn it_does_not_scroll_short_lists() {
    let mut scroll = scroll(10, 20);
    scroll.down();
    scroll.last();
    assert_eq!(scroll.position, 0);
}

#[test]
fn it_jumps_to_last() {
    let mut scroll = scroll(100, 20);
    scroll.last();
    assert_eq!(scroll.position, 80);

    scroll.up_page();
    assert_eq!(scroll.position, 70);
}

#[test]
fn it_clamps_when_the_list_shrinks() {
    let mut scroll = scroll(100, 20);
    scroll.last();
    scroll.set_state(30, 20);
    assert_eq!(scroll.position, 10);
}
