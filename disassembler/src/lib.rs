use std::fmt;

use common::decoder::decode;
use common::image::Image;

pub struct Disassembled {
    pub addr: u16,
    pub repr: u16,
    pub interp: Option<String>,
}

impl fmt::Display for Disassembled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#06x}:\t{:#06x}", self.addr, self.repr)?;
        if let Some(interp) = &self.interp {
            write!(f, "\t{interp}")?;
        }
        Ok(())
    }
}

// Every word gets an interpretation, except the reserved opcodes, which are
// more likely data.
pub fn disassemble(image: &Image) -> Vec<Disassembled> {
    image.placed()
        .map(|(addr, word)| {
            let ins = decode(word);
            let interp = (!ins.is_rti() && !ins.is_res())
                .then(|| ins.display_with_pc(addr).to_string());
            Disassembled{addr, repr: word, interp}
        })
        .collect()
}
