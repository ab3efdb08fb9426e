use bio::alignment::pairwise::Aligner;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use seqmol::libs::align::{align, AlignMode, AlignParams, GapPenalty, SubstitutionMatrix};
use seqmol::libs::seq::{Alphabet, SymbolSequence};

fn random_dna(rng: &mut SmallRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
}

// bio charges open + extend * len for a gap; ours is open + extend * (len - 1)
fn bio_gap(gap: GapPenalty) -> (i32, i32) {
    match gap {
        GapPenalty::Linear(g) => (0, g),
        GapPenalty::Affine { open, extend } => (open - extend, extend),
    }
}

fn compare(mode: AlignMode, gap: GapPenalty, seed: u64) -> anyhow::Result<()> {
    let alphabet = Alphabet::nucleotide();
    let matrix = SubstitutionMatrix::nuc();
    let params = AlignParams::new(mode, gap).with_max_number(1);
    let (open, extend) = bio_gap(gap);
    let score = |a: u8, b: u8| if a == b { 5 } else { -4 };

    let mut rng = SmallRng::seed_from_u64(seed);
    for _ in 0..50 {
        let len1 = rng.gen_range(1..40);
        let len2 = rng.gen_range(1..40);
        let text1 = random_dna(&mut rng, len1);
        let text2 = random_dna(&mut rng, len2);

        let seq1 = SymbolSequence::from_text(&text1, &alphabet)?;
        let seq2 = SymbolSequence::from_text(&text2, &alphabet)?;
        let ours = align(&seq1, &seq2, &matrix, &params)?.score();

        let mut aligner = Aligner::new(open, extend, score);
        let theirs = match mode {
            AlignMode::Global => aligner.global(&text1, &text2).score,
            AlignMode::SemiGlobal => aligner.semiglobal(&text1, &text2).score,
            AlignMode::Local => aligner.local(&text1, &text2).score,
        };

        assert_eq!(
            ours,
            theirs,
            "{} {} {:?}: {} vs {}",
            mode,
            gap,
            (String::from_utf8_lossy(&text1), String::from_utf8_lossy(&text2)),
            ours,
            theirs
        );
    }

    Ok(())
}

#[test]
fn global_scores_agree_with_bio() -> anyhow::Result<()> {
    compare(AlignMode::Global, GapPenalty::Linear(-6), 7)?;
    compare(
        AlignMode::Global,
        GapPenalty::Affine {
            open: -10,
            extend: -1,
        },
        11,
    )?;
    Ok(())
}

#[test]
fn semi_global_scores_agree_with_bio() -> anyhow::Result<()> {
    compare(
        AlignMode::SemiGlobal,
        GapPenalty::Affine {
            open: -10,
            extend: -1,
        },
        13,
    )?;
    Ok(())
}

#[test]
fn local_scores_agree_with_bio() -> anyhow::Result<()> {
    compare(AlignMode::Local, GapPenalty::Linear(-6), 17)?;
    compare(
        AlignMode::Local,
        GapPenalty::Affine {
            open: -10,
            extend: -1,
        },
        19,
    )?;
    compare(
        AlignMode::Local,
        GapPenalty::Affine {
            open: -5,
            extend: -2,
        },
        23,
    )?;
    Ok(())
}
