use log::LevelFilter;
use simrt::{
  BumpAllocator, HostRegion, printf,
  logger::{SinkLogger, init_logger},
  sink::StdoutSink,
  snprintf,
};

static LOGGER: SinkLogger<StdoutSink> = SinkLogger::new(StdoutSink, LevelFilter::Trace);

fn main() {
  let mut out = StdoutSink;

  // The allocator's own trace/warn records go to stdout too.
  unsafe {
    init_logger(&LOGGER).expect("logger installed twice");
  }

  // Stand-in for the simulator's heap window: 64 bytes of real memory.
  let region = HostRegion::map(64).expect("mmap failed");
  let mut allocator = BumpAllocator::new(region.config());

  // Host addresses and sizes are usize, wider than %x's 32 bits: use %ll.

  printf!(
    &mut out,
    "heap window %llx..%llx (%llu bytes)\n",
    region.config().base(),
    region.config().end(),
    region.size()
  );

  // --------------------------------------------------------------------
  // 1) Allocate a u32 and use it.
  // --------------------------------------------------------------------
  let first = allocator.allocate(size_of::<u32>()).expect("fits");
  let first_ptr = first as *mut u32;
  unsafe { first_ptr.write(0xdead_beef) };

  printf!(
    &mut out,
    "\n[1] u32 at %llx = %x\n",
    first,
    unsafe { first_ptr.read() }
  );

  // --------------------------------------------------------------------
  // 2) An odd-sized block; the cursor is rounded up to the next word.
  // --------------------------------------------------------------------
  let second = allocator.allocate(7).expect("fits");
  printf!(
    &mut out,
    "[2] 7 bytes at %llx, cursor now %llx (+%llu)\n",
    second,
    allocator.cursor(),
    allocator.cursor() - second
  );

  // --------------------------------------------------------------------
  // 3) Deallocate is a no-op: the next block does not reuse the first.
  // --------------------------------------------------------------------
  allocator.deallocate(first);
  let third = allocator.allocate(2).expect("fits");
  printf!(
    &mut out,
    "[3] freed %llx, next block at %llx\n",
    first,
    third
  );

  // --------------------------------------------------------------------
  // 4) Ask for more than is left.
  // --------------------------------------------------------------------
  match allocator.allocate(allocator.remaining() + 1) {
    Ok(address) => printf!(&mut out, "[4] unexpected block at %llx\n", address),
    Err(err) => {
      let mut line = [0u8; 80];
      let len = snprintf!(&mut line, "%s", err.to_string().as_str());
      printf!(&mut out, "[4] %s (%llu chars)\n", &line[..], len)
    }
  };

  // --------------------------------------------------------------------
  // 5) Buffered formatting truncates but reports the full length.
  // --------------------------------------------------------------------
  let mut small = [0u8; 6];
  let len = snprintf!(&mut small, "%05d|%+d|%llx", -42, 7, u64::MAX);
  printf!(
    &mut out,
    "[5] snprintf into 6 bytes: \"%s\", would have written %llu\n",
    &small[..],
    len
  );
}
