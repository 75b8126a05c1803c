// Browser-only tests: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use swamp_valentine::selection::SelectionStore;
use swamp_valentine::{Category, InputSnapshot, KeyValueStore, LocalStorage, start_app};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const KEY: &str = "valentineSelections.test";

fn local() -> LocalStorage {
    let win = web_sys::window().expect("window");
    LocalStorage::from_window(&win)
}

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let mut first = SelectionStore::new(local(), KEY);
    first.clear();
    first.snapshot(&InputSnapshot::new().with(Category::Dates, ["movie-night"]));

    let mut second = SelectionStore::new(local(), KEY);
    assert!(second.restore());
    assert_eq!(second.record().dates, vec!["movie-night"]);

    second.clear();
    assert!(local().get(KEY).is_none());
}

#[wasm_bindgen_test]
fn garbage_in_local_storage_is_ignored() {
    let mut raw = local();
    raw.set(KEY, "definitely not json");
    let mut store = SelectionStore::new(local(), KEY);
    assert!(!store.restore());
    assert!(store.record().is_empty());
    raw.remove(KEY);
}

#[wasm_bindgen_test]
fn second_start_is_refused() {
    let doc = web_sys::window().expect("window").document().expect("document");
    let body = doc.body().expect("body");
    for id in ["yesBtn", "noBtn"] {
        if doc.get_element_by_id(id).is_none() {
            let el = doc.create_element("button").expect("button");
            el.set_id(id);
            body.append_child(&el).expect("append");
        }
    }
    assert!(start_app().is_ok());
    assert!(start_app().is_err());
}
