#![cfg(target_arch = "wasm32")]

use checkpoint_web::handle::GameHandle;
use wasm_bindgen_test::wasm_bindgen_test;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn handle_starts_on_menu_and_enters_a_shift() {
    let mut handle = GameHandle::new(None).unwrap();
    assert_eq!(handle.screen(), "menu");
    assert!(handle.run_code().starts_with("CP-"));
    handle.set_focused(true);
    assert!(handle.key("Enter", true, false));
    handle.frame(0.0).unwrap();
    handle.frame(16.0).unwrap();
    assert_eq!(handle.screen(), "shift");
    assert!(handle.snapshot().is_ok());
}

#[wasm_bindgen_test]
fn bad_run_codes_are_rejected() {
    assert!(GameHandle::new(Some("CP-??".to_string())).is_err());
}
