use super::Scroll;

#[test]
fn it_starts_at_the_top() {
    let scroll = Scroll::default();

    assert_eq!(scroll.position, 0);
    assert!(scroll.is_at_end());
}

#[test]
fn it_follows_new_content_at_the_end() {
    let mut scroll = Scroll::default();

    scroll.set_state(30, 10);
    assert_eq!(scroll.position, 20);

    scroll.set_state(35, 10);
    assert_eq!(scroll.position, 25);
}

#[test]
fn it_stays_put_after_scrolling_up() {
    let mut scroll = Scroll::default();
    scroll.set_state(30, 10);

    scroll.up();
    scroll.up();
    scroll.set_state(35, 10);

    assert_eq!(scroll.position, 18);
    assert!(!scroll.is_at_end());
}

#[test]
fn it_clamps_down() {
    let mut scroll = Scroll::default();
    scroll.set_state(15, 10);
    scroll.up_page();
    assert_eq!(scroll.position, 0);

    scroll.down_page();
    assert_eq!(scroll.position, 5);

    scroll.down();
    assert_eq!(scroll.position, 5);
}

#[test]
fn it_jumps_to_the_last_line() {
    let mut scroll = Scroll::default();
    scroll.set_state(15, 10);
    scroll.up_page();

    scroll.last();

    assert_eq!(scroll.position, 5);
}

#[test]
fn it_does_not_scroll_short_lists() {
    let mut scroll = Scroll::default();
    scroll.set_state(4, 10);

    scroll.down();

    assert_eq!(scroll.position, 0);
}
