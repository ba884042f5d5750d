pub const CONTAINER: &str = "min-h-screen bg-gray-50 dark:bg-gray-900 w-full px-4 py-4";
pub const CONTAINER_SM: &str = "max-w-md mx-auto space-y-4";
pub const CARD: &str = "bg-white dark:bg-gray-800 rounded-lg shadow-lg dark:shadow-[0_4px_12px_-4px_rgba(255,255,255,0.03)] p-4";
pub const CARD_ERROR: &str = "bg-red-50 dark:bg-red-900/50 border border-red-200 dark:border-red-800 rounded-lg p-4 text-red-700 dark:text-red-200";
pub const BUTTON_PRIMARY: &str = "w-full inline-flex items-center justify-center px-4 py-3 rounded-lg font-semibold text-white bg-gradient-to-r from-blue-600 to-blue-700 hover:from-blue-700 hover:to-blue-800 shadow-lg transition-all duration-300 disabled:opacity-50 disabled:cursor-not-allowed";
pub const BUTTON_SECONDARY: &str = "inline-flex items-center justify-center px-4 py-2 rounded-lg font-medium border border-gray-300 dark:border-gray-600 text-gray-900 dark:text-white hover:bg-gray-50 dark:hover:bg-gray-800";
pub const TEXT_H2: &str = "text-2xl font-bold text-gray-900 dark:text-white";
pub const TEXT_H3: &str = "text-xl font-bold text-gray-900 dark:text-white";
pub const TEXT_BODY: &str = "text-gray-600 dark:text-gray-300";
pub const TEXT_SMALL: &str = "text-sm text-gray-500 dark:text-gray-400";
pub const TEXT_LABEL: &str = "text-sm font-medium text-gray-900 dark:text-white";

// Price tabs
pub const TABS: &str = "grid grid-cols-3 gap-2";
pub const TAB: &str = "py-2 rounded-lg text-sm font-semibold border border-gray-300 dark:border-gray-600 text-gray-700 dark:text-gray-300 transition-colors duration-200 disabled:opacity-50";
pub const TAB_ACTIVE: &str = "py-2 rounded-lg text-sm font-semibold border border-blue-600 bg-blue-600 text-white transition-colors duration-200 disabled:opacity-50";

// Track
pub const TRACK_VIEWPORT: &str = "relative overflow-hidden rounded-xl bg-gray-100 dark:bg-gray-800 py-4";
pub const TRACK_STRIP: &str = "flex will-change-transform";
pub const TRACK_POINTER: &str = "absolute inset-y-0 left-1/2 w-0.5 -translate-x-1/2 bg-blue-500 z-10 pointer-events-none";
pub const PRIZE_CARD: &str = "flex-none flex flex-col items-center justify-center rounded-lg bg-white dark:bg-gray-900 shadow p-3";
pub const PRIZE_ICON: &str = "w-16 h-16 object-contain";
pub const PRIZE_LABEL: &str = "mt-2 text-sm font-medium text-gray-900 dark:text-white truncate";
pub const PRIZE_PRICE: &str = "text-xs text-gray-500 dark:text-gray-400";

// Prize table
pub const GRID: &str = "grid grid-cols-3 gap-2";
pub const GRID_ITEM: &str = "flex flex-col items-center rounded-lg bg-white dark:bg-gray-800 p-2";
pub const GRID_ICON: &str = "w-10 h-10 object-contain";

// Result overlay
pub const OVERLAY: &str = "fixed inset-0 z-50 flex items-center justify-center bg-black/60 transition-opacity duration-300";
pub const OVERLAY_CLOSING: &str = "fixed inset-0 z-50 flex items-center justify-center bg-black/60 opacity-0 transition-opacity duration-300";
pub const RESULT_CARD: &str = "bg-white dark:bg-gray-900 rounded-xl shadow-xl p-6 max-w-xs w-full mx-4 text-center space-y-4";
pub const RESULT_ICON: &str = "w-24 h-24 mx-auto object-contain";
