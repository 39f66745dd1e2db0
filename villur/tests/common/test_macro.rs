extern crate villur;

// a rust macro to map a keycode name to its hid byte
#[macro_export]
macro_rules! kc8 {
    ($key: ident) => {
        villur::types::keycode::KeyCode::$key as u8
    };
}

// a rust macro to create the `(modifier, keycodes)` reports a key change is expected to produce
#[macro_export]
macro_rules! key_report {
    ($([$modifier:expr, $keys:expr]),* $(,)?) => {
        vec![
            $(
                ($modifier, $keys),
            )*
        ]
    };
}
