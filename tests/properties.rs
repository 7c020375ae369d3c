//! Property tests for focus, entry and scrolling invariants.

use proptest::prelude::*;

use scripture_tui::event::{Key, KeyEvent};
use scripture_tui::screen::Screen;
use scripture_tui::testing::{ProbeWidget, RecordingSurface};
use scripture_tui::widget::Widget;
use scripture_tui::widgets::{Entry, ScrollableFrame};

#[derive(Debug, Clone)]
enum FocusOp {
    Next,
    Index(usize),
    Previous,
    To(usize),
}

fn focus_op() -> impl Strategy<Value = FocusOp> {
    prop_oneof![
        Just(FocusOp::Next),
        (0usize..6).prop_map(FocusOp::Index),
        Just(FocusOp::Previous),
        (0usize..4).prop_map(FocusOp::To),
    ]
}

#[derive(Debug, Clone)]
enum EntryOp {
    Focus,
    Unfocus,
    Type(char),
    Backspace,
    Enter,
    Escape,
}

fn entry_op() -> impl Strategy<Value = EntryOp> {
    prop_oneof![
        Just(EntryOp::Focus),
        Just(EntryOp::Unfocus),
        prop::sample::select(vec!['a', 'Z', ' ', '3', 'é']).prop_map(EntryOp::Type),
        Just(EntryOp::Backspace),
        Just(EntryOp::Enter),
        Just(EntryOp::Escape),
    ]
}

proptest! {
    #[test]
    fn exactly_one_widget_focused(ops in prop::collection::vec(focus_op(), 0..40)) {
        let mut screen = Screen::new(RecordingSurface::new(10, 4));
        let ids: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|name| screen.add_widget(ProbeWidget::new(name)))
            .collect();
        for op in ops {
            match op {
                FocusOp::Next => { screen.focus_next(None).unwrap(); }
                FocusOp::Index(i) => {
                    let before = screen.focused();
                    if screen.focus_next(Some(i)).is_err() {
                        prop_assert_eq!(screen.focused(), before);
                    }
                }
                FocusOp::Previous => { screen.focus_previous(); }
                FocusOp::To(i) => { screen.focus_to(ids[i]).unwrap(); }
            }
            let focused = ids
                .iter()
                .filter(|&&id| screen.widget::<ProbeWidget>(id).unwrap().is_focused())
                .count();
            prop_assert_eq!(focused, 1);
        }
    }

    #[test]
    fn idle_entry_never_shows_empty(ops in prop::collection::vec(entry_op(), 0..40)) {
        let mut entry = Entry::new(0, 0, 12, "Find", "i.e. John 3");
        for op in ops {
            match op {
                EntryOp::Focus => { entry.focus(); }
                EntryOp::Unfocus => entry.unfocus(),
                EntryOp::Type(ch) => { entry.handle_event(&KeyEvent::plain(Key::Char(ch))); }
                EntryOp::Backspace => { entry.handle_event(&KeyEvent::plain(Key::Backspace)); }
                EntryOp::Enter => { entry.handle_event(&KeyEvent::plain(Key::Enter)); }
                EntryOp::Escape => { entry.handle_event(&KeyEvent::plain(Key::Escape)); }
            }
            if !entry.is_capturing() {
                prop_assert!(!entry.contents.is_empty());
                prop_assert_eq!(entry.contents.trim(), entry.contents.as_str());
            }
        }
    }

    #[test]
    fn scroll_offset_stays_in_bounds(
        lines in 0usize..40,
        height in 3i32..30,
        steps in prop::collection::vec(-12i32..12, 0..60),
    ) {
        let mut frame = ScrollableFrame::new(0, 0, 20, height);
        frame.set_lines((0..lines).map(|n| format!("verse {n}")).collect());
        let floor = -2 * lines as i32 + height;
        let scrollable = 2 * lines as i32 > height - 2;
        for step in steps {
            frame.scroll(step);
            prop_assert!(frame.offset() <= 1);
            if scrollable {
                prop_assert!(frame.offset() >= floor);
            } else {
                prop_assert_eq!(frame.offset(), 1);
            }
        }
    }

    #[test]
    fn scroll_up_past_top_is_noop(extra in 1u32..20) {
        let mut frame = ScrollableFrame::new(0, 0, 20, 6);
        frame.set_lines((0..10).map(|n| n.to_string()).collect());
        for _ in 0..extra {
            prop_assert!(!frame.scroll_up(1));
            prop_assert_eq!(frame.offset(), 1);
        }
    }
}
