use cfg_if::cfg_if;


// Implements `RandomAccess` for `std::fs::File` with the platform's positional read.
cfg_if! {
    if #[cfg(unix)] {
        mod std_fs_unix;
    } else if #[cfg(windows)] {
        mod std_fs_windows;
    }
}
