use alignkit::util::{storage_layout, union_layout, Alignment, Layout};
use alignkit::{abstract_type, println, AlignOf, AlignedCharArray, AlignedCharArrayUnion};
use anyhow::Context;
use clap::{Parser, Subcommand};

/// Inspect the alignment and size of types and aligned storage
#[derive(Parser, Debug)]
struct Options {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print alignment, size and threshold flags of built-in types
    Types,
    /// Print the layout of aligned storage
    Storage {
        /// Required alignment in bytes (a power of two)
        #[arg(short, long)]
        align: usize,

        /// Required size in bytes
        #[arg(short, long, default_value_t = 0)]
        size: usize,

        /// Union candidate given as SIZE:ALIGN; may be repeated
        #[arg(short, long)]
        candidate: Vec<String>,
    },
}

/// Stands in for any trait object in the type table.
#[abstract_type]
trait Object {
    fn id(&self) -> usize;
}

struct Row {
    name: &'static str,
    align: usize,
    size: Option<usize>,
    at_least: [bool; 4],
    at_most: [bool; 4],
}

impl Row {
    fn of<T: AlignOf>(name: &'static str) -> Self {
        Self {
            size: Some(std::mem::size_of::<T>()),
            ..Self::of_unsized::<T>(name)
        }
    }

    fn of_unsized<T: ?Sized + AlignOf>(name: &'static str) -> Self {
        Self {
            name,
            align: T::ALIGNMENT,
            size: None,
            at_least: [
                T::ALIGNMENT_GREATER_EQUAL_2_BYTES,
                T::ALIGNMENT_GREATER_EQUAL_4_BYTES,
                T::ALIGNMENT_GREATER_EQUAL_8_BYTES,
                T::ALIGNMENT_GREATER_EQUAL_16_BYTES,
            ],
            at_most: [
                T::ALIGNMENT_LESS_EQUAL_2_BYTES,
                T::ALIGNMENT_LESS_EQUAL_4_BYTES,
                T::ALIGNMENT_LESS_EQUAL_8_BYTES,
                T::ALIGNMENT_LESS_EQUAL_16_BYTES,
            ],
        }
    }

    fn print(&self) {
        let flag = |b: &bool| if *b { 'y' } else { '-' };
        let [g2, g4, g8, g16] = self.at_least.map(|b| flag(&b));
        let [l2, l4, l8, l16] = self.at_most.map(|b| flag(&b));
        let size = match self.size {
            Some(size) => size.to_string(),
            None => "?".to_owned(),
        };
        println!(
            "{:<28} {:>6} {:>6}   {} {} {} {}   {} {} {} {}",
            self.name, self.align, size, g2, g4, g8, g16, l2, l4, l8, l16,
        );
    }
}

fn print_types() {
    println!(
        "{:<28} {:>6} {:>6}   >=2,4,8,16   <=2,4,8,16",
        "type", "align", "size"
    );
    let rows = [
        Row::of::<u8>("u8"),
        Row::of::<u16>("u16"),
        Row::of::<u32>("u32"),
        Row::of::<u64>("u64"),
        Row::of::<u128>("u128"),
        Row::of::<usize>("usize"),
        Row::of::<f32>("f32"),
        Row::of::<f64>("f64"),
        Row::of::<char>("char"),
        Row::of::<*const ()>("*const ()"),
        Row::of_unsized::<dyn Object>("dyn Trait"),
        Row::of::<AlignedCharArray<16, 3>>("AlignedCharArray<16, 3>"),
        Row::of::<AlignedCharArray<64, 100>>("AlignedCharArray<64, 100>"),
        Row::of::<AlignedCharArrayUnion<u8, u64>>("AlignedCharArrayUnion<u8, u64>"),
    ];
    rows.iter().for_each(Row::print);
}

fn parse_candidate(s: &str) -> anyhow::Result<Layout> {
    let (size, align) = s
        .split_once(':')
        .with_context(|| format!("candidate `{}` is not SIZE:ALIGN", s))?;
    let size: usize = size.trim().parse().context("invalid candidate size")?;
    let align: usize = align.trim().parse().context("invalid candidate alignment")?;
    let align = Alignment::new(align)?;
    Ok(Layout::from_size_align(size, align.get())?)
}

fn union_of(candidates: &[String]) -> anyhow::Result<Layout> {
    anyhow::ensure!(
        candidates.len() <= 10,
        "at most 10 union candidates are supported, got {}",
        candidates.len()
    );
    let candidates = candidates
        .iter()
        .map(|c| parse_candidate(c))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(union_layout(&candidates))
}

fn print_storage(align: usize, size: usize, candidates: &[String]) -> anyhow::Result<()> {
    let layout = storage_layout(align, size)
        .with_context(|| format!("no storage for align={} size={}", align, size))?;
    println!(
        "AlignedCharArray<{}, {}>: size={} align={}",
        align,
        size,
        layout.size(),
        layout.align()
    );
    if !candidates.is_empty() {
        let union = union_of(candidates)?;
        println!(
            "AlignedCharArrayUnion ({} candidates): size={} align={}",
            candidates.len(),
            union.size(),
            union.align()
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    match options.command {
        Command::Types => print_types(),
        Command::Storage {
            align,
            size,
            candidate,
        } => print_storage(align, size, &candidate)?,
    }
    Ok(())
}
