#![no_main]

use cvleaf::{
    leaves::{read_leaf, LeafReaderContext, ReaderConfig, TypeIndex},
    stream::TypeStream,
    Parser,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let context = LeafReaderContext::new(ReaderConfig::lenient());

    let mut parser = Parser::new(data);
    let mut index = TypeIndex(0x1000);
    while parser.has_more_data() {
        if read_leaf(&context, index, &mut parser).is_err() {
            break;
        }
        index = index.next();
    }

    if let Ok(stream) = TypeStream::new(data, LeafReaderContext::new(ReaderConfig::strict())) {
        for leaf in stream.iter().flatten() {
            let _ = leaf.data().references();
        }
    }
});
