use divan::{Bencher, black_box};
use treeparenth::{Cleaner, Head, Sentence, Token, Treebank, convert_sentence};

fn main() {
    divan::main();
}

/// Each token depends on the previous one
fn chain_sentence(len: usize) -> Sentence {
    let mut sentence = Sentence::new(Some("1"));
    sentence.add_token(Token::new("1", Head::Root, "λέγω", "v3spia---"));
    for i in 2..=len {
        let head = Head::Token((i - 1).to_string());
        sentence.add_token(Token::new(&i.to_string(), head, "ἀνήρ", "n-s---mn-"));
    }
    sentence
}

/// Every token depends on the root
fn flat_sentence(len: usize) -> Sentence {
    let mut sentence = Sentence::new(Some("1"));
    sentence.add_token(Token::new("1", Head::Root, "λέγω", "v3spia---"));
    for i in 2..=len {
        let head = Head::Token("1".to_string());
        let lemma = if i % 3 == 0 { "δέ" } else { "λόγος" };
        sentence.add_token(Token::new(&i.to_string(), head, lemma, "n-s---mn-"));
    }
    sentence
}

fn treebank_xml(sentences: usize) -> String {
    let mut xml = String::from("<treebank>\n");
    for s in 0..sentences {
        xml.push_str(&format!("<sentence id=\"{s}\">\n"));
        xml.push_str("<word id=\"1\" lemma=\"ὁράω\" postag=\"v1spia---\" head=\"0\"/>\n");
        xml.push_str("<word id=\"2\" lemma=\"ἀνήρ\" postag=\"n-s---mn-\" head=\"1\"/>\n");
        xml.push_str("<word id=\"3\" lemma=\"ἀγαθός\" postag=\"a-s---mn-\" head=\"2\"/>\n");
        xml.push_str("<word id=\"4\" lemma=\"punc1\" postag=\"u--------\" head=\"1\"/>\n");
        xml.push_str("</sentence>\n");
    }
    xml.push_str("</treebank>\n");
    xml
}

#[divan::bench(args = [10, 100, 1000])]
fn convert_chain(bencher: Bencher, len: usize) {
    let sentence = chain_sentence(len);
    let cleaner = Cleaner::default();
    bencher.bench_local(|| black_box(convert_sentence(black_box(&sentence), &cleaner)));
}

#[divan::bench(args = [10, 100, 1000])]
fn convert_flat(bencher: Bencher, len: usize) {
    let sentence = flat_sentence(len);
    let cleaner = Cleaner::default();
    bencher.bench_local(|| black_box(convert_sentence(black_box(&sentence), &cleaner)));
}

#[divan::bench]
fn read_and_convert(bencher: Bencher) {
    let treebank = Treebank::from_string(&treebank_xml(1000));
    let cleaner = Cleaner::default();
    bencher.bench_local(|| {
        for item in treebank.iter() {
            let item = item.unwrap();
            black_box(convert_sentence(&item.sentence, &cleaner));
        }
    });
}
