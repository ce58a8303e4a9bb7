use std::{
    io::{self, Write},
    mem::MaybeUninit,
    os::fd::{AsRawFd, RawFd},
};

use lib_2048::{Values, GRID_SIZE};

const SQUARE_HEIGHT: usize = 3;
const TOP_ROW: &[u8] = "┏━━━━━━━┳━━━━━━━┳━━━━━━━┳━━━━━━━┓\n".as_bytes();
const SEPERATOR_ROW: &[u8] = "┣━━━━━━━╋━━━━━━━╋━━━━━━━╋━━━━━━━┫\n".as_bytes();
const BOTTOM_ROW: &[u8] = "┗━━━━━━━┻━━━━━━━┻━━━━━━━┻━━━━━━━┛\n".as_bytes();
const EMPTY_ROW: &[u8] = "┃       ┃       ┃       ┃       ┃\n".as_bytes();
const EMPTY_CELL: &[u8] = "┃       ".as_bytes();
const COLOUR_TABLE: [u8; 7] = [90, 33, 31, 32, 33, 36, 35];

const PADDING_ABOVE: usize = (SQUARE_HEIGHT - 1) / 2;
const PADDING_BELOW: usize = (SQUARE_HEIGHT - 1).div_ceil(2);

pub const EMPTY_BOARD: Values = [[0; GRID_SIZE]; GRID_SIZE];

/// Foreground colour for a tile value; `None` for an empty cell.
fn colour(value: u32) -> Option<u8> {
    let exponent = value.checked_ilog2()?.checked_sub(1)?;

    Some(COLOUR_TABLE[exponent as usize % COLOUR_TABLE.len()])
}

fn draw_padding_line(out: &mut impl Write, row: &[u32; GRID_SIZE]) -> io::Result<()> {
    for &value in row {
        if let Some(colour) = colour(value) {
            write!(out, "┃\x1b[{}m       \x1b[m", colour + 10)?;
        } else {
            out.write_all(EMPTY_CELL)?;
        }
    }

    Ok(())
}

/// Draws one board row in place, leaving the cursor on its last line.
fn draw_board_row(out: &mut impl Write, row: &[u32; GRID_SIZE]) -> io::Result<()> {
    for _ in 0..PADDING_ABOVE {
        draw_padding_line(out, row)?;
        out.write_all(b"\x1b[E")?;
    }

    for &value in row {
        if let Some(colour) = colour(value) {
            write!(out, "┃\x1b[7m\x1b[{colour}m{value:^7}\x1b[m")?;
        } else {
            out.write_all(EMPTY_CELL)?;
        }
    }

    for _ in 0..PADDING_BELOW {
        out.write_all(b"\x1b[E")?;
        draw_padding_line(out, row)?;
    }

    Ok(())
}

/// Draws the frame below the cursor and fills in `board`.
pub fn draw_board(out: &mut impl Write, board: &Values) -> io::Result<()> {
    out.write_all(TOP_ROW)?;

    for i in 0..GRID_SIZE {
        if i != 0 {
            out.write_all(SEPERATOR_ROW)?;
        }

        for _ in 0..SQUARE_HEIGHT {
            out.write_all(EMPTY_ROW)?;
        }
    }

    out.write_all(BOTTOM_ROW)?;

    redraw_board(out, &EMPTY_BOARD, board)
}

/// Redraws the rows that differ between `old_board` and `new_board`.
///
/// Expects the cursor on the line just below the frame and leaves it there.
pub fn redraw_board(out: &mut impl Write, old_board: &Values, new_board: &Values) -> io::Result<()> {
    let mut current_line = 0;

    let changed_rows = (0..GRID_SIZE).filter(|&row| new_board[row] != old_board[row]);

    for row in changed_rows {
        let final_row_to_end = PADDING_BELOW + 2;
        let between_rows = SQUARE_HEIGHT + 1;
        let target_line = final_row_to_end + between_rows * (GRID_SIZE - 1 - row) + PADDING_ABOVE;

        if target_line > current_line {
            write!(out, "\x1b[{}F", target_line - current_line)?;
        } else if target_line < current_line {
            write!(out, "\x1b[{}E", current_line - target_line)?;
        }

        draw_board_row(out, &new_board[row])?;
        current_line = target_line - (SQUARE_HEIGHT - 1);
    }

    if current_line != 0 {
        write!(out, "\x1b[{current_line}E")?;
    }

    out.flush()
}

/// Disables echo and line buffering on a terminal until dropped.
pub struct RawMode {
    fd: RawFd,
    original: libc::termios,
}

impl RawMode {
    pub fn enable(fd: &impl AsRawFd) -> io::Result<Self> {
        let fd = fd.as_raw_fd();
        let mut termios = MaybeUninit::uninit();

        let original = unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }

            termios.assume_init()
        };

        let mut raw = original;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON);

        unsafe {
            if libc::tcsetattr(fd, libc::TCSADRAIN, &raw) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(Self { fd, original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSADRAIN, &self.original);
        }
    }
}
