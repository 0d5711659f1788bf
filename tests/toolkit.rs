// SPDX-License-Identifier: MIT
//
// End-to-end scenarios across the member crates, driven through the facade.

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use twidget::tw_widgets::{Direction, FocusChange, FocusMove, Pane};
use twidget::{
    Button, Config, Dialog, EventResult, KeyCode, KeyEvent, Orientation, Rect, Split, TextField,
    TextView, Toolkit, Widget,
};

fn toolkit(toml: &str) -> Toolkit {
    Toolkit::without_logging(Config::from_toml_str(toml).unwrap()).unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::plain(code)
}

fn type_str(w: &mut dyn Widget, text: &str) {
    for ch in text.chars() {
        assert_eq!(w.process_key(KeyEvent::char(ch)), EventResult::Consumed);
    }
}

fn view_text(split: &Split, index: usize) -> String {
    match &split.children()[index] {
        Pane::Leaf(w) => w.as_any().downcast_ref::<TextView>().unwrap().text(),
        Pane::Split(_) => panic!("expected a leaf"),
    }
}

// -- Split panes --------------------------------------------------------------

#[test]
fn three_views_share_ten_rows_and_take_keys_in_turn() {
    let tk = toolkit("");
    let ctx = tk.context();
    let mut split = Split::new(Box::new(TextView::new(ctx, 80, 10)));
    split.set_size(80, 10);
    split.set_position(0, 0);
    split.set_focus(FocusChange::Set);
    split.split(Box::new(TextView::new(ctx, 80, 10)), Orientation::Horizontal);
    split.split(Box::new(TextView::new(ctx, 80, 10)), Orientation::Horizontal);

    let heights: Vec<u16> = split.leaves().iter().map(|(_, r)| r.h).collect();
    assert_eq!(heights, vec![4, 3, 3]);
    assert_eq!(split.leaves()[2].1, Rect::new(0, 7, 80, 3));

    type_str(&mut split, "c");
    assert_eq!(split.process_key(key(KeyCode::F(8))), EventResult::Consumed);
    type_str(&mut split, "a");
    assert_eq!(view_text(&split, 0), "a");
    assert_eq!(view_text(&split, 1), "");
    assert_eq!(view_text(&split, 2), "c");

    split.set_to_end();
    assert!(split.unsplit().is_some());
    let heights: Vec<u16> = split.leaves().iter().map(|(_, r)| r.h).collect();
    assert_eq!(heights, vec![5, 5]);
    assert_eq!(view_text(&split, 0), "a");
}

#[test]
fn unsplit_of_nested_pane_hoists_the_survivor() {
    let tk = toolkit("");
    let ctx = tk.context();
    let mut split = Split::new(Box::new(TextView::new(ctx, 80, 24)));
    split.set_size(80, 24);
    split.set_position(0, 0);
    split.split(Box::new(TextView::new(ctx, 80, 24)), Orientation::Horizontal);
    split.split(Box::new(TextView::new(ctx, 80, 24)), Orientation::Vertical);
    assert!(matches!(split.children()[1], Pane::Split(_)));

    assert!(split.unsplit().is_some());
    assert_eq!(split.len(), 2);
    assert!(split.children().iter().all(|p| matches!(p, Pane::Leaf(_))));
    let rects: Vec<Rect> = split.leaves().into_iter().map(|(_, r)| r).collect();
    assert_eq!(rects, vec![Rect::new(0, 0, 80, 12), Rect::new(0, 12, 80, 12)]);
}

// -- Text field ---------------------------------------------------------------

#[test]
fn shift_end_then_delete_truncates() {
    let tk = toolkit("");
    let mut field = TextField::new(tk.context(), 20);
    type_str(&mut field, "hello");
    field.process_key(key(KeyCode::Home));
    field.process_key(key(KeyCode::Right));
    field.process_key(key(KeyCode::Right));
    field.process_key(key(KeyCode::End).shift());
    field.process_key(key(KeyCode::Delete));
    assert_eq!(field.text(), "he");
    assert_eq!(field.cursor(), 2);
}

#[test]
fn clipboard_is_shared_between_field_and_view() {
    let tk = toolkit("");
    let mut field = TextField::new(tk.context(), 20);
    let mut view = TextView::new(tk.context(), 40, 5);
    type_str(&mut field, "shared");
    field.process_key(KeyEvent::char('a').ctrl());
    field.process_key(KeyEvent::char('c').ctrl());
    view.process_key(KeyEvent::char('v').ctrl());
    assert_eq!(view.text(), "shared");

    tk.shutdown();
    view.process_key(KeyEvent::char('v').ctrl());
    assert_eq!(view.text(), "shared");
}

#[test]
fn rebound_keys_reach_widgets() {
    let tk = toolkit("[keys]\nselect_all = \"alt+a\"\ncut = \"alt+x\"\n");
    let mut field = TextField::new(tk.context(), 20);
    type_str(&mut field, "gone");
    field.process_key(KeyEvent::char('a').alt());
    field.process_key(KeyEvent::char('x').alt());
    assert_eq!(field.text(), "");
    assert_eq!(tk.context().clipboard.get_clipboard().as_deref(), Some("gone"));
}

#[test]
fn tab_spaces_setting_reaches_view() {
    let tk = toolkit("[editing]\ntabsize = 4\ntab_spaces = true\n");
    let mut view = TextView::new(tk.context(), 40, 5);
    type_str(&mut view, "a");
    view.process_key(key(KeyCode::Tab));
    type_str(&mut view, "b");
    assert_eq!(view.text(), "a   b");
}

// -- Dialog -------------------------------------------------------------------

#[test]
fn completion_inside_dialog() {
    let tk = toolkit("");
    let styles = tk.context().styles;
    let mut dialog = Dialog::new("Open", 40, 8, styles);
    let mut field = TextField::new(tk.context(), 20);
    field.set_autocomplete(Rc::new(vec!["alpha", "alpine", "beta"]));
    let field = dialog.push_at(Box::new(field), 2, 1);
    let mut cancel = Button::new("_Cancel", styles);
    cancel.set_focus_move(Direction::Up, FocusMove::Backward(1));
    let cancel_id = dialog.push_at(Box::new(cancel), 2, 5);
    dialog.center_over(Rect::new(0, 0, 80, 24));
    dialog.show();
    dialog.set_focus(FocusChange::Set);

    let closed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&closed);
    dialog.closed.connect(move |_| flag.set(true));

    type_str(&mut dialog, "alp");
    dialog.process_key(key(KeyCode::Down));
    dialog.process_key(key(KeyCode::Down));
    dialog.process_key(key(KeyCode::Enter));
    assert_eq!(dialog.child_mut::<TextField>(field).unwrap().text(), "alpine");

    dialog.process_key(key(KeyCode::Tab));
    assert_eq!(dialog.focused_child(), Some(cancel_id));
    dialog.process_key(key(KeyCode::Up));
    assert_eq!(dialog.focused_child(), Some(field));

    dialog.process_key(key(KeyCode::Escape));
    assert!(closed.get());
}
