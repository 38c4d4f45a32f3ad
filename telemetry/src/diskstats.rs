//! Cumulative disk I/O counters from `/proc/diskstats`.

use std::path::Path;

const SECTOR_BYTES: u64 = 512;

/// Sums bytes read and written over the devices accepted by `include`. Lines that don't have
/// the expected fields are skipped.
pub fn parse_diskstats(
    contents: &str,
    include: impl Fn(&str) -> bool,
) -> (u64, u64) {
    let mut read_bytes = 0_u64;
    let mut write_bytes = 0_u64;
    for line in contents.lines() {
        let fields = line.split_whitespace().collect::<Vec<_>>();
        if fields.len() < 10 || !include(fields[2]) {
            continue;
        }
        let (Ok(sectors_read), Ok(sectors_written)) =
            (fields[5].parse::<u64>(), fields[9].parse::<u64>())
        else {
            continue;
        };
        read_bytes =
            read_bytes.saturating_add(sectors_read.saturating_mul(SECTOR_BYTES));
        write_bytes = write_bytes
            .saturating_add(sectors_written.saturating_mul(SECTOR_BYTES));
    }
    (read_bytes, write_bytes)
}

/// Whole physical disks only: partitions would double count their parent device.
fn is_whole_disk(name: &str) -> bool {
    if name.starts_with("loop") || name.starts_with("ram") {
        return false;
    }
    Path::new("/sys/block").join(name).exists()
}

/// Returns `None` where `/proc/diskstats` is not available.
pub fn read_disk_totals() -> Option<(u64, u64)> {
    let contents = std::fs::read_to_string("/proc/diskstats").ok()?;
    Some(parse_diskstats(&contents, is_whole_disk))
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = "\
   8       0 sda 1000 10 2000 300 500 20 4000 600 0 700 900 0 0 0 0
   8       1 sda1 900 10 1800 280 450 20 3600 550 0 650 830 0 0 0 0
   7       0 loop0 50 0 100 1 0 0 0 0 0 1 1 0 0 0 0
 259       0 nvme0n1 10 0 8 1 2 0 16 1 0 2 2
garbage
";

    #[test]
    fn sums_selected_devices() {
        let (read, written) =
            parse_diskstats(SAMPLE, |name| name == "sda" || name == "nvme0n1");
        assert_eq!(read, (2000 + 8) * 512);
        assert_eq!(written, (4000 + 16) * 512);
    }

    #[test]
    fn nothing_selected() {
        assert_eq!(parse_diskstats(SAMPLE, |_| false), (0, 0));
        assert_eq!(parse_diskstats("", |_| true), (0, 0));
    }
}
