use crate::error::{AudioError, AudioResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Side-file path: `<output>.<suffix>.csv`
fn side_path(output: &Path, suffix: &str) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{suffix}.csv"));
    output.with_file_name(name)
}

fn create(path: &Path) -> AudioResult<BufWriter<File>> {
    let file = File::create(path)
        .map_err(|e| AudioError::Write(format!("{}: {}", path.display(), e)))?;
    Ok(BufWriter::new(file))
}

/// Dump the envelope curve next to an output file.
///
/// Plot rendering is a collaborator concern; this writes the underlying
/// series as `index,value` rows.
pub fn write_envelope_csv(output: &Path, envelope: &[f32]) -> AudioResult<()> {
    let path = side_path(output, "envelope");
    let mut writer = create(&path)?;

    writeln!(writer, "index,envelope")?;
    for (i, v) in envelope.iter().enumerate() {
        writeln!(writer, "{i},{v}")?;
    }

    Ok(())
}

/// Dump the waveform before and after denoising next to an output file
pub fn write_waveform_csv(output: &Path, before: &[f32], after: &[f32]) -> AudioResult<()> {
    let path = side_path(output, "waveform");
    let mut writer = create(&path)?;

    writeln!(writer, "index,before,after")?;
    for (i, (b, a)) in before.iter().zip(after).enumerate() {
        writeln!(writer, "{i},{b},{a}")?;
    }

    Ok(())
}
