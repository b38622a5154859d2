//! Formatting helpers for entry attributes.
//!
//! Turns raw metadata into the strings shown in the listing rows and the footer:
//! `ls`-style mode strings, GNU-style sizes, UTC timestamps and owner names.

use crate::core::fm::DirectoryEntry;

use chrono::{DateTime, Utc};
use humansize::{BINARY, FormatSizeOptions};
use std::ffi::CStr;
use std::mem::MaybeUninit;
use std::ptr;
use std::time::SystemTime;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_BUF_LEN: usize = 4096;

/// Renders a unix mode the way `ls -l` does, e.g. `drwxr-xr-x`.
pub fn format_mode(mode: u32) -> String {
    let kind = match mode & libc::S_IFMT as u32 {
        m if m == libc::S_IFDIR as u32 => 'd',
        m if m == libc::S_IFLNK as u32 => 'l',
        m if m == libc::S_IFCHR as u32 => 'c',
        m if m == libc::S_IFBLK as u32 => 'b',
        m if m == libc::S_IFIFO as u32 => 'p',
        m if m == libc::S_IFSOCK as u32 => 's',
        _ => '-',
    };

    let mut chars = [kind, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    let shifts = [6, 3, 0];
    for (i, &shift) in shifts.iter().enumerate() {
        let base = 1 + i * 3;
        if (mode >> (shift + 2)) & 1 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1 != 0 {
            chars[base + 2] = 'x';
        }
    }

    // setuid, setgid, sticky
    let special = [(0o4000, 3, 's'), (0o2000, 6, 's'), (0o1000, 9, 't')];
    for (bit, idx, lower) in special {
        if mode & bit != 0 {
            chars[idx] = if chars[idx] == 'x' {
                lower
            } else {
                lower.to_ascii_uppercase()
            };
        }
    }
    chars.iter().collect()
}

/// GNU-style human size: `123B`, `4.0K`, `1.5M`.
pub fn format_size(size: u64) -> String {
    if size < 1024 {
        return format!("{size}B");
    }
    let opts = FormatSizeOptions::from(BINARY)
        .decimal_places(1)
        .decimal_zeroes(1)
        .space_after_value(false);
    humansize::format_size(size, opts).replace("iB", "")
}

/// Modification time in UTC, `%Y-%m-%d %H:%M:%S`.
pub fn format_mtime(mtime: Option<SystemTime>) -> String {
    mtime
        .map(|t| {
            let dt: DateTime<Utc> = DateTime::from(t);
            dt.format("%Y-%m-%d %H:%M:%S").to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Looks up the login name for `uid`, falling back to the number.
pub fn user_name(uid: u32) -> String {
    let mut buf = vec![0 as libc::c_char; NAME_BUF_LEN];
    let mut pwd = MaybeUninit::<libc::passwd>::uninit();
    let mut result: *mut libc::passwd = ptr::null_mut();

    // SAFETY: all pointers are valid for the duration of the call and buf.len() is its size
    let rc = unsafe {
        libc::getpwuid_r(
            uid,
            pwd.as_mut_ptr(),
            buf.as_mut_ptr(),
            buf.len(),
            &mut result,
        )
    };
    if rc == 0 && !result.is_null() {
        // SAFETY: on success result points to pwd, whose pw_name points into buf
        let name = unsafe { CStr::from_ptr((*result).pw_name) };
        return name.to_string_lossy().into_owned();
    }
    uid.to_string()
}

/// Looks up the group name for `gid`, falling back to the number.
pub fn group_name(gid: u32) -> String {
    let mut buf = vec![0 as libc::c_char; NAME_BUF_LEN];
    let mut grp = MaybeUninit::<libc::group>::uninit();
    let mut result: *mut libc::group = ptr::null_mut();

    // SAFETY: all pointers are valid for the duration of the call and buf.len() is its size
    let rc = unsafe {
        libc::getgrgid_r(
            gid,
            grp.as_mut_ptr(),
            buf.as_mut_ptr(),
            buf.len(),
            &mut result,
        )
    };
    if rc == 0 && !result.is_null() {
        // SAFETY: on success result points to grp, whose gr_name points into buf
        let name = unsafe { CStr::from_ptr((*result).gr_name) };
        return name.to_string_lossy().into_owned();
    }
    gid.to_string()
}

/// `mode nlink user group mtime` for the footer.
pub fn metadata_line(entry: &DirectoryEntry) -> String {
    format!(
        "{} {} {} {} {}",
        format_mode(entry.mode()),
        entry.nlink(),
        user_name(entry.uid()),
        group_name(entry.gid()),
        format_mtime(entry.mtime())
    )
}

/// Right hand column of a listing row. Symlinks show their target first.
pub fn size_label(entry: &DirectoryEntry) -> String {
    let size = format_size(entry.size());
    match entry.symlink_target() {
        Some(target) => format!("-> {} {}", target.display(), size),
        None => size,
    }
}

/// Name column of a listing row. Directories get a trailing slash.
pub fn display_name(entry: &DirectoryEntry) -> String {
    let name = entry.name().to_string_lossy();
    if entry.is_real_dir() {
        format!("{name}/")
    } else {
        name.into_owned()
    }
}

/// Cuts `text` to at most `width` terminal columns, replacing control characters.
/// Appends `~` when something was cut off.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let clean: String = text
        .chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect();
    if clean.width() <= width {
        return clean;
    }

    let mut out = String::with_capacity(width);
    let mut used = 0;
    for c in clean.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('~');
    out
}
