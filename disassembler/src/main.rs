
use disassembler::{Disassembled, disassemble};
use common::image::Image;

use std::ops::Range;
use std::process::exit;

use clap::Parser;
use log::error;

/// LC-3 Disassembler
#[derive(Parser)]
struct Args {
    /// Image to disassemble
    bin: String,
}

fn remove_long_zeros(disassembly: &mut Vec<Disassembled>) {
    const THRESH: usize = 8;

    let mut ranges = vec![];
    let mut range_start = None;
    for (i, dis) in disassembly.iter().enumerate() {
        if dis.repr == 0 {
            if range_start.is_none() {
                range_start = Some(i);
            }
        } else if let Some(start) = range_start {
            ranges.push(Range{start, end: i});
            range_start = None;
        }
    }
    if let Some(start) = range_start {
        ranges.push(Range{start, end: disassembly.len()});
    }

    for range in ranges.iter().rev() {
        if range.len() > THRESH {
            // Leave the first and last, an ellipses will be added between.
            disassembly.drain(range.start + 1..range.end - 1);
        }
    }
}


fn main() {
    env_logger::init();

    let args = Args::parse();
    let image = match std::fs::read(&args.bin).map_err(Into::into).and_then(|b| Image::from_bytes(&b)) {
        Ok(image) => image,
        Err(e) => {
            error!("{}: {e}", args.bin);
            exit(1);
        },
    };

    let mut disassembly = disassemble(&image);
    remove_long_zeros(&mut disassembly);

    let mut prev: Option<u16> = None;
    for dis in disassembly {
        if let Some(p) = prev {
            if p.wrapping_add(1) != dis.addr {
                println!("...");
            }
        }
        println!("{}", dis);
        prev = Some(dis.addr);
    }
}
